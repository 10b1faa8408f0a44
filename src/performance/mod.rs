use crate::{
    attributes::{DifficultyAttributes, PerformanceAttributes},
    model::mods::GameMods,
};

use self::calculator::PerformanceCalculator;

pub(crate) use self::calculator::PERFORMANCE_BASE_MULTIPLIER;

mod calculator;
pub mod score_state;

pub use self::score_state::ScoreState;

/// Performance calculator.
///
/// # Example
///
/// ```
/// use rizumu_pp::{Beatmap, Difficulty, Performance};
///
/// let map = Beatmap::default();
/// let attrs = Difficulty::new().calculate(&map);
///
/// let perf = Performance::new(attrs)
///     .mods(8 + 16) // HDHR
///     .misses(2)
///     .calculate();
/// # let _ = perf;
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Performance {
    attrs: DifficultyAttributes,
    mods: GameMods,
    combo: Option<u32>,
    n300: Option<u32>,
    n100: Option<u32>,
    n50: Option<u32>,
    misses: Option<u32>,
}

impl Performance {
    /// Create a new performance calculator for the given difficulty
    /// attributes.
    ///
    /// The attributes must have been calculated for the same beatmap and
    /// the same mods, otherwise the results will be incorrect.
    pub fn new(attrs: DifficultyAttributes) -> Self {
        Self {
            attrs,
            mods: GameMods::DEFAULT,
            combo: None,
            n300: None,
            n100: None,
            n50: None,
            misses: None,
        }
    }

    /// Specify the mods.
    pub fn mods(mut self, mods: impl Into<GameMods>) -> Self {
        self.mods = mods.into();

        self
    }

    /// Specify the max combo of the play. Defaults to a full combo.
    pub const fn combo(mut self, combo: u32) -> Self {
        self.combo = Some(combo);

        self
    }

    /// Specify the amount of 300s of a play.
    pub const fn n300(mut self, n300: u32) -> Self {
        self.n300 = Some(n300);

        self
    }

    /// Specify the amount of 100s of a play.
    pub const fn n100(mut self, n100: u32) -> Self {
        self.n100 = Some(n100);

        self
    }

    /// Specify the amount of 50s of a play.
    pub const fn n50(mut self, n50: u32) -> Self {
        self.n50 = Some(n50);

        self
    }

    /// Specify the amount of misses of a play.
    pub const fn misses(mut self, misses: u32) -> Self {
        self.misses = Some(misses);

        self
    }

    /// Provide the hit results of the play through a [`ScoreState`].
    pub const fn state(mut self, state: ScoreState) -> Self {
        self.combo = Some(state.max_combo);
        self.n300 = Some(state.n300);
        self.n100 = Some(state.n100);
        self.n50 = Some(state.n50);
        self.misses = Some(state.misses);

        self
    }

    /// Calculate the performance attributes.
    pub fn calculate(self) -> PerformanceAttributes {
        let state = self.generate_state();
        let effective_miss_count = calculate_effective_miss_count(&self.attrs, &state);
        let acc = state.accuracy();

        PerformanceCalculator::new(self.attrs, &self.mods, acc, state, effective_miss_count)
            .calculate()
    }

    /// Turn the provided hit results into a full [`ScoreState`];
    /// unspecified 300s are filled with the remaining objects and an
    /// unspecified combo counts as a full combo.
    fn generate_state(&self) -> ScoreState {
        let n_objects = self.attrs.n_objects();

        let misses = self.misses.unwrap_or(0).min(n_objects);
        let n50 = self.n50.unwrap_or(0).min(n_objects - misses);
        let n100 = self.n100.unwrap_or(0).min(n_objects - misses - n50);
        let n300 = self
            .n300
            .unwrap_or(n_objects - misses - n50 - n100)
            .min(n_objects - misses - n50 - n100);

        ScoreState {
            max_combo: self.combo.unwrap_or(self.attrs.max_combo),
            n300,
            n100,
            n50,
            misses,
        }
    }
}

impl From<DifficultyAttributes> for Performance {
    fn from(attrs: DifficultyAttributes) -> Self {
        Self::new(attrs)
    }
}

fn calculate_effective_miss_count(attrs: &DifficultyAttributes, state: &ScoreState) -> f64 {
    // * Guess the number of misses + slider breaks from combo
    let mut combo_based_miss_count = 0.0;

    if attrs.n_sliders > 0 {
        let full_combo_threshold = f64::from(attrs.max_combo) - 0.1 * f64::from(attrs.n_sliders);

        if f64::from(state.max_combo) < full_combo_threshold {
            combo_based_miss_count = full_combo_threshold / f64::from(state.max_combo).max(1.0);
        }
    }

    // * Clamp miss count to maximum amount of possible breaks
    combo_based_miss_count =
        combo_based_miss_count.min(f64::from(state.n100 + state.n50 + state.misses));

    combo_based_miss_count.max(f64::from(state.misses))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const MAX_COMBO: u32 = 939;
    const N_CIRCLES: u32 = 603;
    const N_SLIDERS: u32 = 192;
    const N_SPINNERS: u32 = 5;

    fn attrs() -> DifficultyAttributes {
        DifficultyAttributes {
            aim: 4.1,
            speed: 3.4,
            accuracy: 4.8,
            flashlight: 2.9,
            speed_note_count: 312.4,
            ar: 9.3,
            od: 8.7,
            hp: 5.0,
            great_hit_window: 27.8,
            ok_hit_window: 70.4,
            meh_hit_window: 113.0,
            n_circles: N_CIRCLES,
            n_sliders: N_SLIDERS,
            n_spinners: N_SPINNERS,
            max_combo: MAX_COMBO,
            stars: 6.1,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1000))]

        #[test]
        fn effective_misses_stay_within_bounds(
            combo in 0_u32..=MAX_COMBO,
            n100 in 0_u32..=400,
            n50 in 0_u32..=100,
            misses in 0_u32..=300,
        ) {
            let n_objects = N_CIRCLES + N_SLIDERS + N_SPINNERS;
            let misses = misses.min(n_objects);
            let n50 = n50.min(n_objects - misses);
            let n100 = n100.min(n_objects - misses - n50);

            let state = ScoreState {
                max_combo: combo,
                n300: n_objects - misses - n50 - n100,
                n100,
                n50,
                misses,
            };

            let effective = calculate_effective_miss_count(&attrs(), &state);

            prop_assert!(effective >= f64::from(misses));
            prop_assert!(effective <= f64::from(state.total_hits()));
        }

        #[test]
        fn outputs_are_finite_and_non_negative(
            combo in 0_u32..=MAX_COMBO,
            n100 in 0_u32..=800,
            n50 in 0_u32..=800,
            misses in 0_u32..=800,
        ) {
            let perf = Performance::new(attrs())
                .combo(combo)
                .n100(n100)
                .n50(n50)
                .misses(misses)
                .calculate();

            for value in [
                perf.pp,
                perf.pp_aim,
                perf.pp_speed,
                perf.pp_acc,
                perf.pp_flashlight,
                perf.effective_miss_count,
            ] {
                prop_assert!(!value.is_nan());
                prop_assert!(value >= 0.0);
            }

            prop_assert!(perf.pp.is_finite());
        }

        #[test]
        fn more_greats_never_decrease_pp(
            n100 in 0_u32..=300,
        ) {
            let worse = Performance::new(attrs()).n100(n100 + 10).calculate();
            let better = Performance::new(attrs()).n100(n100).calculate();

            prop_assert!(better.pp >= worse.pp - 1e-9);
        }
    }

    #[test]
    fn no_successful_hits_zeroes_deviation_scaled_terms() {
        let n_objects = N_CIRCLES + N_SLIDERS + N_SPINNERS;

        let perf = Performance::new(attrs())
            .combo(0)
            .n300(0)
            .n100(0)
            .n50(0)
            .misses(n_objects)
            .calculate();

        assert_eq!(perf.deviation, f64::INFINITY);
        assert_eq!(perf.speed_deviation, f64::INFINITY);
        assert_eq!(perf.pp_acc, 0.0);
        assert_eq!(perf.pp_aim, 0.0);
        assert_eq!(perf.pp_speed, 0.0);
    }

    #[test]
    fn flawless_score_has_finite_deviation() {
        let perf = Performance::new(attrs()).calculate();

        assert!(perf.deviation > 0.0);
        assert!(perf.deviation.is_finite());
        assert!(perf.pp_acc > 0.0);
        assert!(!perf.pp.is_nan());
    }
}
