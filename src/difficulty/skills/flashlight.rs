use crate::{
    difficulty::object::DifficultyObject,
    difficulty::skills::strain::{strain_decay, StrainState},
    model::mods::GameMods,
};

const SKILL_MULTIPLIER: f64 = 138.0;
const STRAIN_DECAY_BASE: f64 = 0.15;

/// Flashlight: how hard the map is to read when only a small area around
/// the cursor is visible.
#[derive(Clone)]
pub struct Flashlight {
    curr_strain: f64,
    has_hidden_mod: bool,
    time_preempt: f64,
    time_fade_in: f64,
    inner: StrainState,
}

impl Flashlight {
    pub fn new(mods: &GameMods, time_preempt: f64, time_fade_in: f64) -> Self {
        Self {
            curr_strain: 0.0,
            has_hidden_mod: mods.hd(),
            time_preempt,
            time_fade_in,
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

    /// Unlike the other strain skills, flashlight difficulty is the plain
    /// sum of all section peaks.
    pub fn difficulty_value(self) -> f64 {
        self.inner.into_current_strain_peaks().iter().sum()
    }

    pub fn difficulty_to_performance(difficulty: f64) -> f64 {
        25.0 * difficulty.powf(2.0)
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
        self.curr_strain += FlashlightEvaluator::evaluate_diff_of(
            curr,
            objects,
            self.has_hidden_mod,
            self.time_preempt,
            self.time_fade_in,
        ) * SKILL_MULTIPLIER;

        self.curr_strain
    }
}

struct FlashlightEvaluator;

impl FlashlightEvaluator {
    const MAX_OPACITY_BONUS: f64 = 0.4;
    const HIDDEN_BONUS: f64 = 0.2;
    const MIN_ANGLE_MULTIPLIER: f64 = 0.2;

    /// Distances below this many radii are considered easily visible
    /// within the flashlight circle.
    const SMALL_DIST_THRESHOLD: f64 = 1.5;
    /// Stacked objects closer than this are only counted once.
    const STACK_THRESHOLD: f64 = 0.5;

    fn evaluate_diff_of<'a>(
        curr: &'a DifficultyObject<'a>,
        diff_objects: &'a [DifficultyObject<'a>],
        hidden: bool,
        time_preempt: f64,
        time_fade_in: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return 0.0;
        }

        let mut small_dist_nerf = 1.0;
        let mut cumulative_strain_time = 0.0;

        let mut result = 0.0;

        let mut last_obj = curr;

        let mut angle_repeat_count = 0.0;

        // * This is iterating backwards in time from the current object.
        for i in 0..curr.idx.min(10) {
            let Some(curr_obj) = curr.previous(i, diff_objects) else {
                break;
            };

            if !curr_obj.base.is_spinner() {
                let jump_dist = f64::hypot(
                    curr.norm_pos[0] - curr_obj.norm_pos[0],
                    curr.norm_pos[1] - curr_obj.norm_pos[1],
                );

                cumulative_strain_time += last_obj.strain_time;

                // * We want to nerf objects that can be easily seen within the Flashlight circle radius.
                if i == 0 {
                    small_dist_nerf = (jump_dist / Self::SMALL_DIST_THRESHOLD).min(1.0);
                }

                // * We also want to nerf stacks so that only the first object of the stack is accounted for.
                let stack_nerf = (curr_obj.jump_dist / Self::STACK_THRESHOLD).min(1.0);

                // * Bonus based on how visible the object is.
                let opacity_bonus = 1.0
                    + Self::MAX_OPACITY_BONUS
                        * (1.0
                            - curr.opacity_at(
                                curr_obj.start_time,
                                hidden,
                                time_preempt,
                                time_fade_in,
                            ));

                result += stack_nerf * opacity_bonus * jump_dist / cumulative_strain_time;

                if let Some((curr_obj_angle, curr_angle)) = curr_obj.angle.zip(curr.angle) {
                    // * Objects further back in time should count less for the nerf.
                    if (curr_obj_angle - curr_angle).abs() < 0.02 {
                        angle_repeat_count += (1.0 - 0.1 * i as f64).max(0.0);
                    }
                }
            }

            last_obj = curr_obj;
        }

        result = (small_dist_nerf * result).powf(2.0);

        // * Additional bonus for Hidden due to there being no approach circles.
        if hidden {
            result *= 1.0 + Self::HIDDEN_BONUS;
        }

        // * Nerf patterns with repeated angles.
        result *= Self::MIN_ANGLE_MULTIPLIER
            + (1.0 - Self::MIN_ANGLE_MULTIPLIER) / (angle_repeat_count + 1.0);

        result
    }
}
