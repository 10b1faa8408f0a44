use crate::{
    difficulty::object::DifficultyObject,
    difficulty::skills::strain::{self, strain_decay, StrainState},
    util::difficulty::{bpm_to_milliseconds, milliseconds_to_bpm},
};

const SKILL_MULTIPLIER: f64 = 1.46;
const STRAIN_DECAY_BASE: f64 = 0.3;

/// Speed: how demanding the tapping is, weighted by local rhythm
/// complexity.
#[derive(Clone)]
pub struct Speed {
    current_strain: f64,
    current_rhythm: f64,
    /// Full width of the great window, i.e. twice its half-width.
    hit_window: f64,
    has_autopilot_mod: bool,
    inner: StrainState,
}

impl Speed {
    pub const REDUCED_SECTION_COUNT: usize = 5;
    pub const REDUCED_STRAIN_BASELINE: f64 = 0.75;

    pub fn new(hit_window: f64, has_autopilot_mod: bool) -> Self {
        Self {
            current_strain: 0.0,
            current_rhythm: 0.0,
            hit_window,
            has_autopilot_mod,
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
            let initial_strain =
                self.calculate_initial_strain(self.inner.current_section_end, curr, objects);
            self.inner.start_new_section_from(initial_strain);
            self.inner.current_section_end += StrainState::SECTION_LENGTH;
        }

        let strain = self.strain_value_at(curr, objects);
        self.inner.note_strain(strain);
    }

    /// The amount of notes that actually stress tapping speed; spinners and
    /// slowly approached notes contribute fractionally.
    pub fn relevant_note_count(&self) -> f64 {
        self.inner
            .object_strains
            .iter()
            .copied()
            .max_by(f64::total_cmp)
            .filter(|&n| n > 0.0)
            .map_or(0.0, |max_strain| {
                self.inner.object_strains.iter().fold(0.0, |sum, strain| {
                    sum + (1.0 + f64::exp(-(strain / max_strain * 12.0 - 6.0))).recip()
                })
            })
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

        (self.current_strain * self.current_rhythm)
            * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
    }

    fn strain_value_at(
        &mut self,
        curr: &DifficultyObject<'_>,
        objects: &[DifficultyObject<'_>],
    ) -> f64 {
        self.current_strain *= strain_decay(curr.strain_time, STRAIN_DECAY_BASE);
        self.current_strain +=
            SpeedEvaluator::evaluate_diff_of(curr, objects, self.hit_window, self.has_autopilot_mod)
                * SKILL_MULTIPLIER;
        self.current_rhythm = RhythmEvaluator::evaluate_diff_of(curr, objects, self.hit_window);

        self.current_strain * self.current_rhythm
    }
}

struct SpeedEvaluator;

impl SpeedEvaluator {
    /// 1.25 circle diameters between centers, in radius units.
    const SINGLE_SPACING_THRESHOLD: f64 = 2.5;
    /// 200 BPM 1/4th.
    const MIN_SPEED_BONUS: f64 = 200.0;
    const SPEED_BALANCING_FACTOR: f64 = 40.0;
    const DIST_MULTIPLIER: f64 = 0.9;

    fn evaluate_diff_of<'a>(
        curr: &'a DifficultyObject<'a>,
        diff_objects: &'a [DifficultyObject<'a>],
        hit_window: f64,
        autopilot: bool,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let next = curr.next(0, diff_objects);
        let doubletapness = 1.0 - curr.get_doubletapness(next, hit_window);

        // * Cap deltatime to the OD 300 hitwindow.
        // * 0.93 is derived from making sure 260bpm OD8 streams aren't nerfed harshly, whilst 0.92 limits the effect of the cap.
        let mut strain_time = curr.strain_time;
        strain_time /= ((strain_time / hit_window) / 0.93).clamp(0.92, 1.0);

        let speed_bonus = if milliseconds_to_bpm(strain_time, None) > Self::MIN_SPEED_BONUS {
            // * Add additional scaling bonus for streams/bursts higher than 200bpm
            let base = (bpm_to_milliseconds(Self::MIN_SPEED_BONUS, None) - strain_time)
                / Self::SPEED_BALANCING_FACTOR;

            0.75 * base.powf(2.0)
        } else {
            0.0
        };

        let dist = Self::SINGLE_SPACING_THRESHOLD.min(curr.jump_dist);

        let dist_bonus = if autopilot {
            0.0
        } else {
            (dist / Self::SINGLE_SPACING_THRESHOLD).powf(3.95) * Self::DIST_MULTIPLIER
        };

        // * Base difficulty with all bonuses
        let difficulty = (1.0 + speed_bonus + dist_bonus) * 1000.0 / strain_time;

        // * Apply penalty if there's doubletappable doubles
        difficulty * doubletapness
    }
}

pub(crate) struct RhythmEvaluator;

impl RhythmEvaluator {
    /// 5 seconds of calculation window.
    const HISTORY_TIME_MAX: f64 = 5000.0;
    const HISTORY_OBJECTS_MAX: usize = 8;
    const RHYTHM_OVERALL_MULTIPLIER: f64 = 0.95;
    const RHYTHM_RATIO_MULTIPLIER: f64 = 12.0;

    /// Multiplier for the rhythm complexity around an object, at least 1.
    ///
    /// Changes between local delta times earn a bonus based on how uneven
    /// the ratio is, damped when the deltas are within timing tolerance of
    /// each other, when a slider is involved, or when the change could be
    /// doubletapped away; older changes decay with their distance in time.
    pub fn evaluate_diff_of<'a>(
        curr: &'a DifficultyObject<'a>,
        diff_objects: &'a [DifficultyObject<'a>],
        hit_window: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let mut rhythm_complexity_sum = 0.0;

        let delta_difference_eps = hit_window * 0.3;
        let historical_note_count = curr.idx.min(Self::HISTORY_OBJECTS_MAX);

        for i in (1..historical_note_count).rev() {
            let (Some(curr_obj), Some(prev_obj)) = (
                curr.previous(i - 1, diff_objects),
                curr.previous(i, diff_objects),
            ) else {
                continue;
            };

            let elapsed = curr.start_time - curr_obj.start_time;

            if elapsed >= Self::HISTORY_TIME_MAX {
                continue;
            }

            // * scales note 0 to 1 from history to now
            let time_decay = (Self::HISTORY_TIME_MAX - elapsed) / Self::HISTORY_TIME_MAX;
            let note_decay = (historical_note_count - i) as f64 / historical_note_count as f64;

            // * either we're limited by time or limited by object count.
            let historical_decay = note_decay.min(time_decay);

            let curr_delta = curr_obj.strain_time;
            let prev_delta = prev_obj.strain_time;

            // * calculate how much current delta difference deserves a rhythm bonus
            // * this function is meant to reduce rhythm bonus for deltas that are multiples of each other (i.e 100 and 200)
            let delta_difference_ratio = prev_delta.min(curr_delta) / prev_delta.max(curr_delta);
            let curr_ratio = 1.0
                + Self::RHYTHM_RATIO_MULTIPLIER
                    * (std::f64::consts::PI / delta_difference_ratio)
                        .sin()
                        .powf(2.0)
                        .min(0.5);

            // changes within timing tolerance of each other are not rhythm
            let window_penalty = (((prev_delta - curr_delta).abs() - delta_difference_eps).max(0.0)
                / delta_difference_eps)
                .min(1.0);

            let mut effective_ratio = window_penalty * curr_ratio;

            // * bpm change is into slider, this is easy acc window
            if curr_obj.base.is_slider() {
                effective_ratio *= 0.125;
            }

            // * bpm change was from a slider, this is easier typically than circle -> circle
            if prev_obj.base.is_slider() {
                effective_ratio *= 0.3;
            }

            // * scale down the difficulty if the object is doubletappable
            let doubletapness = prev_obj.get_doubletapness(Some(curr_obj), hit_window);
            effective_ratio *= 1.0 - doubletapness * 0.75;

            rhythm_complexity_sum += effective_ratio.sqrt() * historical_decay;
        }

        // * produces multiplier that can be applied to strain. range [1, infinity) (not really though)
        (4.0 + rhythm_complexity_sum * Self::RHYTHM_OVERALL_MULTIPLIER).sqrt() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        difficulty::scaling_factor::ScalingFactor,
        model::{
            beatmap::HitWindows,
            hit_object::{HitObject, HitObjectKind},
            pos::Pos,
        },
    };

    fn timeline(times: &[f64]) -> (Vec<HitObject>, ScalingFactor) {
        let hit_objects = times
            .iter()
            .map(|&start_time| HitObject {
                pos: Pos::new(100.0, 100.0),
                start_time,
                kind: HitObjectKind::Circle,
            })
            .collect();

        (hit_objects, ScalingFactor::new(4.0))
    }

    fn diff_objects<'a>(
        hit_objects: &'a [HitObject],
        scaling: &ScalingFactor,
    ) -> Vec<DifficultyObject<'a>> {
        let hit_windows = HitWindows {
            preempt: 600.0,
            great: 26.0,
            ok: 68.0,
            meh: 110.0,
        };

        hit_objects
            .iter()
            .skip(1)
            .enumerate()
            .map(|(idx, h)| {
                let last = &hit_objects[idx];
                let last_last = idx.checked_sub(1).map(|i| &hit_objects[i]);

                DifficultyObject::new(h, last, last_last, 1.0, idx, scaling, hit_windows)
            })
            .collect()
    }

    #[test]
    fn steady_rhythm_has_no_bonus() {
        let times: Vec<_> = (0..16).map(|i| f64::from(i) * 300.0).collect();
        let (hit_objects, scaling) = timeline(&times);
        let objects = diff_objects(&hit_objects, &scaling);

        let multiplier =
            RhythmEvaluator::evaluate_diff_of(objects.last().unwrap(), &objects, 52.0);

        assert!((multiplier - 1.0).abs() < 1e-9, "{multiplier}");
    }

    #[test]
    fn uneven_rhythm_is_rewarded() {
        // 3/4-ish alternation
        let mut time = 0.0;
        let times: Vec<_> = (0..16)
            .map(|i| {
                time += if i % 2 == 0 { 300.0 } else { 170.0 };

                time
            })
            .collect();
        let (hit_objects, scaling) = timeline(&times);
        let objects = diff_objects(&hit_objects, &scaling);

        let multiplier =
            RhythmEvaluator::evaluate_diff_of(objects.last().unwrap(), &objects, 52.0);

        assert!(multiplier > 1.0, "{multiplier}");
    }

    #[test]
    fn spinner_is_not_tapped() {
        let times: Vec<_> = (0..4).map(|i| f64::from(i) * 300.0).collect();
        let (mut hit_objects, scaling) = timeline(&times);
        hit_objects[3].kind = HitObjectKind::Spinner { end_time: 1000.0 };
        let objects = diff_objects(&hit_objects, &scaling);

        let value = SpeedEvaluator::evaluate_diff_of(&objects[2], &objects, 52.0, false);

        assert!(value.abs() < f64::EPSILON);
    }
}
