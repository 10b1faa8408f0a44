use std::f64::consts::SQRT_2;

use crate::{
    difficulty::object::DifficultyObject,
    difficulty::skills::speed::RhythmEvaluator,
    util::{root_finding::find_root_expand, special_functions::erf},
};

/// The probability of a flawless playthrough that defines the required
/// deviation: a player whose timing deviation equals the skill's
/// difficulty value full-combos the map with all greats 1% of the time.
const FC_PROBABILITY_THRESHOLD: f64 = 0.01;

/// Maps the required deviation onto a rating comparable with the strain
/// skills; tighter deviation means a higher rating.
const ACCURACY_RATING_SCALE: f64 = 25.0;

const DEVIATION_ACCURACY: f64 = 1e-6;

/// Accuracy: how precisely the player must time their taps.
///
/// Unlike the strain skills this one has no notion of decay; it collects
/// the effective hit window of every timed object and afterwards inverts
/// the Gaussian timing-error model over all of them at once.
#[derive(Clone, Default)]
pub struct Accuracy {
    hit_windows: Vec<f64>,
    /// Half-width of the great window.
    great_window: f64,
}

impl Accuracy {
    pub fn new(great_window: f64) -> Self {
        Self {
            hit_windows: Vec::with_capacity(256),
            great_window,
        }
    }

    pub fn process(&mut self, curr: &DifficultyObject<'_>, objects: &[DifficultyObject<'_>]) {
        let window = AccuracyEvaluator::effective_hit_window(curr, objects, self.great_window);

        if window.is_finite() {
            self.hit_windows.push(window);
        }
    }

    /// The deviation in milliseconds at which a flawless playthrough of all
    /// processed objects has probability [`FC_PROBABILITY_THRESHOLD`];
    /// [`f64::INFINITY`] if nothing constrains the timing.
    ///
    /// Hitting an object with hit window `h` given i.i.d. Gaussian timing
    /// error with deviation `σ` has probability `erf(h / (√2 σ))`, so the
    /// flawless probability is the product over all objects. That product
    /// is strictly decreasing in `σ` which makes the threshold crossing
    /// unique; it is found by expanding a bracket upwards from the great
    /// window and root-finding in log-space.
    pub fn required_deviation(&self) -> f64 {
        if self.hit_windows.is_empty() {
            return f64::INFINITY;
        }

        let target = FC_PROBABILITY_THRESHOLD.ln();

        find_root_expand(
            |sigma| self.log_fc_probability(sigma) - target,
            DEVIATION_ACCURACY,
            self.great_window.max(1.0),
            DEVIATION_ACCURACY,
        )
    }

    /// The required deviation expressed as a difficulty rating.
    pub fn difficulty_value(self) -> f64 {
        ACCURACY_RATING_SCALE / self.required_deviation()
    }

    fn log_fc_probability(&self, sigma: f64) -> f64 {
        self.hit_windows
            .iter()
            .map(|h| erf(h / (SQRT_2 * sigma)).ln())
            .sum()
    }
}

struct AccuracyEvaluator;

impl AccuracyEvaluator {
    /// The time window within which a hit still counts as a great,
    /// tightened by the local rhythm complexity; [`f64::INFINITY`] for
    /// spinners, which are never timing-constrained.
    fn effective_hit_window<'a>(
        curr: &'a DifficultyObject<'a>,
        diff_objects: &'a [DifficultyObject<'a>],
        great_window: f64,
    ) -> f64 {
        if curr.base.is_spinner() {
            return f64::INFINITY;
        }

        let rhythm_multiplier =
            RhythmEvaluator::evaluate_diff_of(curr, diff_objects, 2.0 * great_window);

        0.5 * great_window / rhythm_multiplier
    }
}
