use crate::model::{beatmap::HitWindows, hit_object::HitObject};

use super::scaling_factor::ScalingFactor;

/// One hit object preprocessed for the difficulty calculation.
///
/// The first object of a beatmap produces no difficulty object; index 0
/// belongs to the second hit object. Neighbor relations are resolved by
/// index arithmetic over the flat timeline slice, so there are no pointers
/// and no cycles to manage.
pub struct DifficultyObject<'a> {
    pub idx: usize,
    pub base: &'a HitObject,
    pub start_time: f64,
    pub delta_time: f64,
    /// [`delta_time`](Self::delta_time) clamped to at least
    /// [`MIN_DELTA_TIME`](Self::MIN_DELTA_TIME) so that stacked objects
    /// don't produce singularities.
    pub strain_time: f64,
    /// Playfield position in units of the hit radius.
    pub norm_pos: [f64; 2],
    /// Distance to the previous object in units of the hit radius.
    pub jump_dist: f64,
    /// Angle formed by this object and its two predecessors.
    pub angle: Option<f64>,
    /// The judgement windows; identical for every object of a calculation.
    /// Spinners are never timing-constrained and are special-cased by the
    /// evaluators instead.
    pub hit_windows: HitWindows,
}

impl<'a> DifficultyObject<'a> {
    pub const MIN_DELTA_TIME: f64 = 25.0;

    pub fn new(
        hit_object: &'a HitObject,
        last_object: &'a HitObject,
        last_last_object: Option<&HitObject>,
        clock_rate: f64,
        idx: usize,
        scaling_factor: &ScalingFactor,
        hit_windows: HitWindows,
    ) -> Self {
        let delta_time = (hit_object.start_time - last_object.start_time) / clock_rate;
        let start_time = hit_object.start_time / clock_rate;
        let strain_time = delta_time.max(Self::MIN_DELTA_TIME);

        let norm_pos = normalize(hit_object, scaling_factor);

        let mut this = Self {
            idx,
            base: hit_object,
            start_time,
            delta_time,
            strain_time,
            norm_pos,
            jump_dist: 0.0,
            angle: None,
            hit_windows,
        };

        this.set_distances(last_object, last_last_object, scaling_factor);

        this
    }

    /// The `backwards_idx`-th preceding difficulty object, if any.
    pub fn previous<'o>(
        &self,
        backwards_idx: usize,
        diff_objects: &'o [DifficultyObject<'a>],
    ) -> Option<&'o DifficultyObject<'a>> {
        self.idx
            .checked_sub(backwards_idx + 1)
            .and_then(|idx| diff_objects.get(idx))
    }

    /// The `forwards_idx`-th following difficulty object, if any.
    pub fn next<'o>(
        &self,
        forwards_idx: usize,
        diff_objects: &'o [DifficultyObject<'a>],
    ) -> Option<&'o DifficultyObject<'a>> {
        diff_objects.get(self.idx + forwards_idx + 1)
    }

    /// How likely it is that this object and the next can be hit as one
    /// doubletap instead of two deliberate taps.
    pub fn get_doubletapness(&self, next: Option<&Self>, hit_window: f64) -> f64 {
        let Some(next) = next else { return 0.0 };

        let hit_window = if self.base.is_spinner() {
            0.0
        } else {
            hit_window
        };

        let curr_delta_time = self.delta_time.max(1.0);
        let next_delta_time = next.delta_time.max(1.0);
        let delta_diff = (next_delta_time - curr_delta_time).abs();
        let speed_ratio = curr_delta_time / curr_delta_time.max(delta_diff);
        let window_ratio = (curr_delta_time / hit_window).min(1.0).powf(2.0);

        1.0 - speed_ratio.powf(1.0 - window_ratio)
    }

    /// How visible the object is at `time`, between 0 and 1.
    pub fn opacity_at(&self, time: f64, hidden: bool, time_preempt: f64, time_fade_in: f64) -> f64 {
        if time > self.start_time {
            // * Consider a hitobject as being invisible when its start time is passed.
            // * In reality the hitobject will be visible beyond its start time up until its hittable window has passed,
            // * but this is an approximation and such a case is unlikely to be hit where this function is used.
            return 0.0;
        }

        let fade_in_start_time = self.start_time - time_preempt;
        let fade_in_duration = time_fade_in;

        if hidden {
            let fade_out_start_time = self.start_time - time_preempt + time_fade_in;
            let fade_out_duration = time_preempt * super::HD_FADE_OUT_DURATION_MULTIPLIER;

            (((time - fade_in_start_time) / fade_in_duration).clamp(0.0, 1.0))
                .min(1.0 - ((time - fade_out_start_time) / fade_out_duration).clamp(0.0, 1.0))
        } else {
            ((time - fade_in_start_time) / fade_in_duration).clamp(0.0, 1.0)
        }
    }

    fn set_distances(
        &mut self,
        last_object: &HitObject,
        last_last_object: Option<&HitObject>,
        scaling_factor: &ScalingFactor,
    ) {
        if self.base.is_spinner() || last_object.is_spinner() {
            return;
        }

        let last_pos = normalize(last_object, scaling_factor);

        self.jump_dist = dist(self.norm_pos, last_pos);

        if let Some(last_last_object) = last_last_object.filter(|h| !h.is_spinner()) {
            let last_last_pos = normalize(last_last_object, scaling_factor);

            let v1 = [last_last_pos[0] - last_pos[0], last_last_pos[1] - last_pos[1]];
            let v2 = [
                self.norm_pos[0] - last_pos[0],
                self.norm_pos[1] - last_pos[1],
            ];

            let dot = v1[0] * v2[0] + v1[1] * v2[1];
            let det = v1[0] * v2[1] - v1[1] * v2[0];

            self.angle = Some(det.atan2(dot).abs());
        }
    }
}

fn normalize(hit_object: &HitObject, scaling_factor: &ScalingFactor) -> [f64; 2] {
    [
        f64::from(hit_object.pos.x) * scaling_factor.factor,
        f64::from(hit_object.pos.y) * scaling_factor.factor,
    ]
}

fn dist(a: [f64; 2], b: [f64; 2]) -> f64 {
    f64::hypot(a[0] - b[0], a[1] - b[1])
}
