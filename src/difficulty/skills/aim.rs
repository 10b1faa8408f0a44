use crate::{
    difficulty::object::DifficultyObject,
    difficulty::skills::strain::{self, strain_decay, StrainState},
    util::{quadrature::integrate, root_finding::find_root_chandrupatla},
};

const SKILL_MULTIPLIER: f64 = 1280.0;
const STRAIN_DECAY_BASE: f64 = 0.15;

/// Aim: how fast the cursor has to travel to reach each object in time.
#[derive(Clone, Default)]
pub struct Aim {
    curr_strain: f64,
    inner: StrainState,
}

impl Aim {
    pub const REDUCED_SECTION_COUNT: usize = 10;
    pub const REDUCED_STRAIN_BASELINE: f64 = 0.75;

    pub fn new() -> Self {
        Self {
            curr_strain: 0.0,
            inner: StrainState::new(),
        }
    }

    pub fn process(&mut self, curr: &DifficultyObject<'_>, objects: &[DifficultyObject<'_>]) {
        if curr.idx == 0 {
            self.inner.current_section_end = (curr.start_time / StrainState::SECTION_LENGTH).ceil()
                * StrainState::SECTION_LENGTH;
        }

        while curr.start_time > self.inner.current_section_end {
            self.inner.save_current_peak();
            let initial_strain = self.calculate_initial_strain(self.inner.current_section_end, curr, objects);
            self.inner.start_new_section_from(initial_strain);
            self.inner.current_section_end += StrainState::SECTION_LENGTH;
        }

        let strain = self.strain_value_at(curr, objects);
        self.inner.note_strain(strain);
    }

    pub fn difficulty_value(self) -> f64 {
        strain::difficulty_value(
            self.inner.into_current_strain_peaks(),
            Self::REDUCED_SECTION_COUNT,
            Self::REDUCED_STRAIN_BASELINE,
            StrainState::DECAY_WEIGHT,
        )
    }

    pub fn difficulty_to_performance(difficulty: f64) -> f64 {
        strain::difficulty_to_performance(difficulty)
    }

    fn calculate_initial_strain(
        &self,
        time: f64,
        curr: &DifficultyObject<'_>,
        objects: &[DifficultyObject<'_>],
    ) -> f64 {
        let prev_start_time = curr.previous(0, objects).map_or(0.0, |prev| prev.start_time);

        self.curr_strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
    }

    fn strain_value_at(
        &mut self,
        curr: &DifficultyObject<'_>,
        objects: &[DifficultyObject<'_>],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain += AimEvaluator::evaluate_diff_of(curr, objects) * SKILL_MULTIPLIER;

        self.curr_strain
    }
}

pub(crate) struct AimEvaluator;

impl AimEvaluator {
    /// Tolerance shared by the circle-crossing root-finder and the
    /// cursor-speed quadrature.
    const NUMERICAL_ALGORITHM_ACCURACY: f64 = 1e-3;

    /// The average cursor speed while the cursor is within the object's hit
    /// radius, in radii per millisecond.
    ///
    /// The cursor path through an object is modelled per coordinate as a
    /// quintic Hermite interpolant between the neighboring clicks, with
    /// central-difference endpoint velocities and zero endpoint
    /// acceleration. The in-radius window is bounded by where that path
    /// crosses the unit circle around the object; locating the crossing
    /// needs root-finding only when the neighboring object is more than one
    /// radius away.
    ///
    /// A missing (or spinner) neighbor leaves the corresponding side of the
    /// window at half the meh hit window, with no cursor movement in it.
    pub fn evaluate_diff_of<'a>(
        curr: &'a DifficultyObject<'a>,
        diff_objects: &'a [DifficultyObject<'a>],
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let prev = curr
            .previous(0, diff_objects)
            .filter(|h| !h.base.is_spinner());
        let next = curr.next(0, diff_objects).filter(|h| !h.base.is_spinner());
        let prev2 = curr
            .previous(1, diff_objects)
            .filter(|h| !h.base.is_spinner());
        let next2 = curr.next(1, diff_objects).filter(|h| !h.base.is_spinner());

        let curr_vel = central_velocity(prev, next);

        // Entry side: from the cursor crossing into the hit radius after
        // the previous click up to this object's click.
        let (time_in, dist_in) = if let Some(prev) = prev {
            let prev_vel = central_velocity(prev2, Some(curr));
            let path = PathSegment::new(prev, curr, prev_vel, curr_vel, curr.strain_time);

            let enter_u = if curr.jump_dist * curr.jump_dist > 1.0 {
                find_root_chandrupatla(
                    |u| path.dist_squared_to(u, curr.norm_pos) - 1.0,
                    0.0,
                    1.0,
                    Self::NUMERICAL_ALGORITHM_ACCURACY,
                )
            } else {
                0.0
            };

            (
                (1.0 - enter_u) * path.duration,
                path.arc_length(enter_u, 1.0),
            )
        } else {
            (0.5 * curr.hit_windows.meh, 0.0)
        };

        // Exit side: from this object's click until the cursor leaves the
        // hit radius on its way to the next object.
        let (time_out, dist_out) = if let Some(next) = next {
            let next_vel = central_velocity(Some(curr), next2);
            let path = PathSegment::new(curr, next, curr_vel, next_vel, next.strain_time);

            let exit_u = if next.jump_dist * next.jump_dist > 1.0 {
                find_root_chandrupatla(
                    |u| path.dist_squared_to(u, curr.norm_pos) - 1.0,
                    0.0,
                    1.0,
                    Self::NUMERICAL_ALGORITHM_ACCURACY,
                )
            } else {
                1.0
            };

            (exit_u * path.duration, path.arc_length(0.0, exit_u))
        } else {
            (0.5 * curr.hit_windows.meh, 0.0)
        };

        (dist_in + dist_out) / (time_in + time_out)
    }
}

/// Central-difference velocity at an object, in radii per millisecond;
/// zero whenever one of its neighbors is missing.
fn central_velocity(
    before: Option<&DifficultyObject<'_>>,
    after: Option<&DifficultyObject<'_>>,
) -> [f64; 2] {
    match (before, after) {
        (Some(before), Some(after)) => {
            let dt = (after.start_time - before.start_time)
                .max(2.0 * DifficultyObject::MIN_DELTA_TIME);

            [
                (after.norm_pos[0] - before.norm_pos[0]) / dt,
                (after.norm_pos[1] - before.norm_pos[1]) / dt,
            ]
        }
        _ => [0.0; 2],
    }
}

/// The cursor path between two consecutive clicks, one quintic Hermite
/// interpolant per coordinate over the curve parameter `u ∈ [0, 1]`.
struct PathSegment {
    x: QuinticHermite,
    y: QuinticHermite,
    duration: f64,
}

impl PathSegment {
    fn new(
        from: &DifficultyObject<'_>,
        to: &DifficultyObject<'_>,
        from_vel: [f64; 2],
        to_vel: [f64; 2],
        duration: f64,
    ) -> Self {
        // Velocities become slopes w.r.t. the curve parameter.
        Self {
            x: QuinticHermite::new(
                from.norm_pos[0],
                from_vel[0] * duration,
                to.norm_pos[0],
                to_vel[0] * duration,
            ),
            y: QuinticHermite::new(
                from.norm_pos[1],
                from_vel[1] * duration,
                to.norm_pos[1],
                to_vel[1] * duration,
            ),
            duration,
        }
    }

    fn dist_squared_to(&self, u: f64, center: [f64; 2]) -> f64 {
        let dx = self.x.value(u) - center[0];
        let dy = self.y.value(u) - center[1];

        dx * dx + dy * dy
    }

    /// Distance travelled between the curve parameters `lo` and `hi`.
    fn arc_length(&self, lo: f64, hi: f64) -> f64 {
        integrate(
            |u| f64::hypot(self.x.derivative(u), self.y.derivative(u)),
            lo,
            hi,
            AimEvaluator::NUMERICAL_ALGORITHM_ACCURACY,
        )
    }
}

/// A scalar quintic Hermite interpolant over `[0, 1]` matching the given
/// endpoint values and slopes, with zero second derivative at both ends.
struct QuinticHermite {
    coefs: [f64; 6],
}

impl QuinticHermite {
    fn new(p0: f64, m0: f64, p1: f64, m1: f64) -> Self {
        Self {
            coefs: [
                p0,
                m0,
                0.0,
                -10.0 * p0 - 6.0 * m0 + 10.0 * p1 - 4.0 * m1,
                15.0 * p0 + 8.0 * m0 - 15.0 * p1 + 7.0 * m1,
                -6.0 * p0 - 3.0 * m0 + 6.0 * p1 - 3.0 * m1,
            ],
        }
    }

    fn value(&self, u: f64) -> f64 {
        self.coefs
            .iter()
            .rev()
            .fold(0.0, |acc, &coef| acc * u + coef)
    }

    fn derivative(&self, u: f64) -> f64 {
        self.coefs
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (i, &coef)| acc * u + i as f64 * coef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        difficulty::scaling_factor::ScalingFactor,
        model::{
            beatmap::{Beatmap, HitWindows},
            hit_object::{HitObject, HitObjectKind},
            pos::Pos,
        },
    };

    fn uniform_map(n: usize, spacing_radii: f64, delta: f64) -> Beatmap {
        let scaling = ScalingFactor::new(4.0);
        let spacing_px = (spacing_radii * scaling.radius) as f32;

        let hit_objects = (0..n)
            .map(|i| HitObject {
                pos: Pos::new(i as f32 * spacing_px, 0.0),
                start_time: i as f64 * delta,
                kind: HitObjectKind::Circle,
            })
            .collect();

        Beatmap {
            hit_objects,
            ar: 9.0,
            od: 9.0,
            cs: 4.0,
            hp: 5.0,
        }
    }

    fn timeline(map: &Beatmap) -> Vec<DifficultyObject<'_>> {
        let scaling = ScalingFactor::new(f64::from(map.cs));
        let hit_windows = HitWindows {
            preempt: 600.0,
            great: 26.0,
            ok: 68.0,
            meh: 110.0,
        };

        map.hit_objects
            .iter()
            .skip(1)
            .enumerate()
            .map(|(idx, h)| {
                let last = &map.hit_objects[idx];
                let last_last = idx.checked_sub(1).map(|i| &map.hit_objects[i]);

                DifficultyObject::new(h, last, last_last, 1.0, idx, &scaling, hit_windows)
            })
            .collect()
    }

    #[test]
    fn hermite_degenerates_to_line_for_uniform_motion() {
        // Matching endpoint slopes make the quintic collapse onto linear
        // motion.
        let poly = QuinticHermite::new(0.0, 0.5, 0.5, 0.5);

        for u in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!((poly.value(u) - 0.5 * u).abs() < 1e-12);
            assert!((poly.derivative(u) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn hermite_matches_boundary_conditions() {
        let poly = QuinticHermite::new(1.0, -2.0, 3.0, 0.5);

        assert!((poly.value(0.0) - 1.0).abs() < 1e-12);
        assert!((poly.value(1.0) - 3.0).abs() < 1e-12);
        assert!((poly.derivative(0.0) + 2.0).abs() < 1e-12);
        assert!((poly.derivative(1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn uniform_spacing_matches_closed_form_average_speed() {
        // 500 circles, 0.5 radii apart, 300 ms apart: no crossing
        // root-finding happens (distance² ≤ 1) and for interior objects the
        // interpolated path degenerates to constant-velocity motion, so the
        // average in-radius speed has the closed form
        // (jump in + jump out) / (time in + time out).
        let delta = 300.0;
        let map = uniform_map(500, 0.5, delta);
        let objects = timeline(&map);

        for curr in objects.iter().skip(5).take(objects.len() - 10) {
            let next = curr.next(0, &objects).unwrap();
            let expected = (curr.jump_dist + next.jump_dist) / (curr.strain_time + next.strain_time);

            let value = AimEvaluator::evaluate_diff_of(curr, &objects);

            assert!(
                (value - expected).abs() < 1e-6,
                "idx {}: {value} vs {expected}",
                curr.idx
            );
        }
    }

    #[test]
    fn far_jumps_use_circle_crossing() {
        // 4 radii apart: the in-radius window is cut down to the quarter of
        // each segment nearest to the object, but under constant-velocity
        // motion the average speed still equals the whole-segment average,
        // which pins down both the crossing location and the integral.
        let delta = 300.0;
        let map = uniform_map(50, 4.0, delta);
        let objects = timeline(&map);

        let curr = &objects[20];
        let value = AimEvaluator::evaluate_diff_of(curr, &objects);
        let expected = curr.jump_dist / delta;

        assert!((value - expected).abs() < 1e-6, "{value} vs {expected}");
    }

    #[test]
    fn spinners_contribute_nothing() {
        let mut map = uniform_map(20, 1.0, 300.0);
        map.hit_objects[10].kind = HitObjectKind::Spinner {
            end_time: map.hit_objects[10].start_time + 100.0,
        };

        let objects = timeline(&map);

        assert!(AimEvaluator::evaluate_diff_of(&objects[9], &objects).abs() < f64::EPSILON);
    }
}
