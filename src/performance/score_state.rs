/// Aggregation of a score's hit judgements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    /// Maximum combo that the score has had so far. **Not** the maximum
    /// possible combo of the map so far.
    pub max_combo: u32,
    /// Amount of current 300s (greats).
    pub n300: u32,
    /// Amount of current 100s (oks).
    pub n100: u32,
    /// Amount of current 50s (mehs).
    pub n50: u32,
    /// Amount of current misses.
    pub misses: u32,
}

impl ScoreState {
    /// Create a new empty score state.
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            n300: 0,
            n100: 0,
            n50: 0,
            misses: 0,
        }
    }

    /// Return the total amount of hits by adding everything up.
    pub const fn total_hits(&self) -> u32 {
        self.n300 + self.n100 + self.n50 + self.misses
    }

    /// Return the amount of hits that were not misses.
    pub const fn total_successful_hits(&self) -> u32 {
        self.n300 + self.n100 + self.n50
    }

    /// Calculate the accuracy between `0.0` and `1.0`.
    pub fn accuracy(&self) -> f64 {
        if self.total_hits() == 0 {
            return 0.0;
        }

        let numerator = 6 * self.n300 + 2 * self.n100 + self.n50;
        let denominator = 6 * self.total_hits();

        f64::from(numerator) / f64::from(denominator)
    }
}
