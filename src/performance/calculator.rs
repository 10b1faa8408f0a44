use std::f64::consts::{PI, SQRT_2};

use crate::{
    attributes::{DifficultyAttributes, PerformanceAttributes},
    difficulty::skills::{aim::Aim, flashlight::Flashlight, speed::Speed},
    model::mods::GameMods,
    util::special_functions::{erf, erf_inv},
};

use super::score_state::ScoreState;

// * This is being adjusted to keep the final pp value scaled around what it used to be when changing things.
pub const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.15;

/// Skill-specific constants dividing the estimated deviation inside the
/// erf-based scaling factors: the looser a player's timing, the less their
/// score demonstrates of each skill.
const AIM_DEVIATION_SCALE: f64 = 25.0;
const SPEED_DEVIATION_SCALE: f64 = 20.0;
const ACCURACY_DEVIATION_SCALE: f64 = 18.0;

pub(super) struct PerformanceCalculator<'mods> {
    attrs: DifficultyAttributes,
    mods: &'mods GameMods,
    acc: f64,
    state: ScoreState,
    effective_miss_count: f64,
}

impl<'a> PerformanceCalculator<'a> {
    pub const fn new(
        attrs: DifficultyAttributes,
        mods: &'a GameMods,
        acc: f64,
        state: ScoreState,
        effective_miss_count: f64,
    ) -> Self {
        Self {
            attrs,
            mods,
            acc,
            state,
            effective_miss_count,
        }
    }
}

impl PerformanceCalculator<'_> {
    pub fn calculate(self) -> PerformanceAttributes {
        if self.state.total_hits() == 0 {
            return PerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let total_hits = f64::from(self.state.total_hits());

        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if self.mods.nf() {
            multiplier *= (1.0 - 0.02 * self.effective_miss_count).max(0.9);
        }

        if self.mods.so() {
            multiplier *= 1.0 - (f64::from(self.attrs.n_spinners) / total_hits).powf(0.85);
        }

        let deviation = self.calculate_total_deviation();
        let speed_deviation = self.calculate_speed_deviation();

        let aim_value = self.compute_aim_value(deviation);
        let speed_value = self.compute_speed_value(speed_deviation);
        let acc_value = self.compute_accuracy_value(deviation);
        let flashlight_value = self.compute_flashlight_value();

        let pp = (aim_value.powf(1.1)
            + speed_value.powf(1.1)
            + acc_value.powf(1.1)
            + flashlight_value.powf(1.1))
        .powf(1.0 / 1.1)
            * multiplier;

        PerformanceAttributes {
            difficulty: self.attrs,
            pp,
            pp_aim: aim_value,
            pp_speed: speed_value,
            pp_acc: acc_value,
            pp_flashlight: flashlight_value,
            effective_miss_count: self.effective_miss_count,
            deviation,
            speed_deviation,
        }
    }

    fn compute_aim_value(&self, deviation: f64) -> f64 {
        if self.mods.ap() {
            return 0.0;
        }

        let mut aim_value = Aim::difficulty_to_performance(self.attrs.aim);

        let total_hits = self.total_hits();

        let len_bonus = 0.95
            + 0.4 * (total_hits / 2000.0).min(1.0)
            + f64::from(u8::from(total_hits > 2000.0)) * (total_hits / 2000.0).log10() * 0.5;

        aim_value *= len_bonus;

        // * Penalize misses by assessing # of misses relative to the total # of objects.
        // * Default a 3% reduction for any # of misses.
        if self.effective_miss_count > 0.0 {
            aim_value *= Self::miss_penalty(self.effective_miss_count, total_hits);
        }

        aim_value *= self.combo_scaling_factor();

        let ar_factor = if self.mods.rx() {
            0.0
        } else if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else if self.attrs.ar < 8.0 {
            0.05 * (8.0 - self.attrs.ar)
        } else {
            0.0
        };

        // * Buff for longer maps with high AR.
        aim_value *= 1.0 + ar_factor * len_bonus;

        if self.mods.hd() || self.mods.bl() {
            // * We want to give more reward for lower AR when it comes to aim and HD. This nerfs high AR and buffs lower AR.
            aim_value *= 1.0 + 0.04 * (12.0 - self.attrs.ar);
        }

        // A sloppy cursor shows in sloppy timing as well.
        aim_value *= erf(AIM_DEVIATION_SCALE / (SQRT_2 * deviation));

        aim_value
    }

    fn compute_speed_value(&self, speed_deviation: f64) -> f64 {
        if self.mods.rx() {
            return 0.0;
        }

        let mut speed_value = Speed::difficulty_to_performance(self.attrs.speed);

        let total_hits = self.total_hits();

        let len_bonus = 0.95
            + 0.4 * (total_hits / 2000.0).min(1.0)
            + f64::from(u8::from(total_hits > 2000.0)) * (total_hits / 2000.0).log10() * 0.5;

        speed_value *= len_bonus;

        if self.effective_miss_count > 0.0 {
            speed_value *= Self::miss_penalty(self.effective_miss_count, total_hits);
        }

        speed_value *= self.combo_scaling_factor();

        let ar_factor = if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else {
            0.0
        };

        // * Buff for longer maps with high AR.
        speed_value *= 1.0 + ar_factor * len_bonus;

        if self.mods.hd() || self.mods.bl() {
            speed_value *= 1.0 + 0.04 * (12.0 - self.attrs.ar);
        }

        speed_value *= erf(SPEED_DEVIATION_SCALE / (SQRT_2 * speed_deviation));

        speed_value
    }

    fn compute_accuracy_value(&self, deviation: f64) -> f64 {
        if self.mods.rx() {
            return 0.0;
        }

        // * This percentage only considers HitCircles of any value - in this part
        // * of the calculation we focus on hitting the timing hit window.
        let amount_hit_objects_with_acc = f64::from(self.attrs.n_circles);

        let mut acc_value = 120.0 * (self.attrs.accuracy / 5.0).powf(2.0);

        // The deviation most consistent with the observed judgements decides
        // how much of that difficulty the score demonstrates.
        acc_value *= erf(ACCURACY_DEVIATION_SCALE / (SQRT_2 * deviation));

        // * Bonus for many hitcircles - it's harder to keep good accuracy up for longer.
        acc_value *= (amount_hit_objects_with_acc / 1000.0).powf(0.3).min(1.15);

        if self.mods.hd() || self.mods.bl() {
            acc_value *= 1.08;
        }

        if self.mods.fl() {
            acc_value *= 1.02;
        }

        acc_value
    }

    fn compute_flashlight_value(&self) -> f64 {
        if !self.mods.fl() {
            return 0.0;
        }

        let mut flashlight_value = Flashlight::difficulty_to_performance(self.attrs.flashlight);

        let total_hits = self.total_hits();

        if self.effective_miss_count > 0.0 {
            flashlight_value *= Self::miss_penalty(self.effective_miss_count, total_hits);
        }

        flashlight_value *= self.combo_scaling_factor();

        // * Account for shorter maps having a higher ratio of 0 combo/100 combo flashlight radius.
        flashlight_value *= 0.7
            + 0.1 * (total_hits / 200.0).min(1.0)
            + f64::from(u8::from(total_hits > 200.0))
                * 0.2
                * ((total_hits - 200.0) / 200.0).min(1.0);

        // * Scale the flashlight value with accuracy _slightly_.
        flashlight_value *= 0.5 + self.acc / 2.0;

        flashlight_value
    }

    /// Deviation most consistent with all judgements, attributing mistakes
    /// to the accuracy-relevant objects (the hit circles) in the worst
    /// case; [`f64::INFINITY`] when the score has no successful hits.
    fn calculate_total_deviation(&self) -> f64 {
        if self.state.total_successful_hits() == 0 {
            return f64::INFINITY;
        }

        let (great, ok, meh, miss) = self.relevant_counts(f64::from(self.attrs.n_circles));

        self.calculate_deviation(great, ok, meh, miss)
    }

    /// Deviation restricted to the notes that stress tapping speed, since
    /// speed and aim have different failure semantics.
    fn calculate_speed_deviation(&self) -> f64 {
        if self.state.total_successful_hits() == 0 {
            return f64::INFINITY;
        }

        // * Calculate accuracy assuming the worst case scenario
        let speed_note_count = self.attrs.speed_note_count
            + (f64::from(self.state.total_hits()) - self.attrs.speed_note_count) * 0.1;

        let (great, ok, meh, miss) = self.relevant_counts(speed_note_count);

        self.calculate_deviation(great, ok, meh, miss)
    }

    /// Distributes the score's judgements across `object_count` objects,
    /// assuming the worst case: every mistake landed on a relevant object.
    fn relevant_counts(&self, object_count: f64) -> (f64, f64, f64, f64) {
        let miss = f64::from(self.state.misses).min(object_count);
        let meh = f64::from(self.state.n50).min(object_count - miss);
        let ok = f64::from(self.state.n100).min(object_count - miss - meh);
        let great = (object_count - miss - meh - ok).max(0.0);

        (great, ok, meh, miss)
    }

    /// Estimates the player's deviation from the judgement counts on
    /// `great + ok + meh + miss` objects.
    ///
    /// The naive sample proportion of greats would overestimate skill on
    /// small samples, so a 99%-confidence lower bound on the underlying hit
    /// probability is used instead.
    fn calculate_deviation(&self, great: f64, ok: f64, meh: f64, miss: f64) -> f64 {
        if great + ok + meh <= 0.0 {
            return f64::INFINITY;
        }

        let object_count = great + ok + meh + miss;

        // * The probability that a player hits a circle is unknown, but we can estimate it to be
        // * the number of greats on circles divided by the number of circles, and then add one
        // * to the number of circles as a bias correction.
        let n = (object_count - miss - meh).max(1.0);

        // * 99% critical value for the normal distribution (one-tailed).
        #[allow(clippy::unreadable_literal)]
        const Z: f64 = 2.32634787404;

        // * Proportion of greats hit on circles, ignoring misses and 50s.
        let p = great / n;

        // * We can be 99% confident that p is at least this value.
        let p_lower_bound = (n * p + Z * Z / 2.0) / (n + Z * Z)
            - Z / (n + Z * Z) * f64::sqrt(n * p * (1.0 - p) + Z * Z / 4.0);

        let great_hit_window = self.attrs.great_hit_window;
        let ok_hit_window = self.attrs.ok_hit_window;
        let meh_hit_window = self.attrs.meh_hit_window;

        // * Compute the deviation assuming greats and oks are normally distributed, and mehs are uniformly distributed.
        // * Begin with greats and oks first. Ignoring mehs, we can be 99% confident that the deviation is not higher than:
        let mut deviation = great_hit_window / (SQRT_2 * erf_inv(p_lower_bound));

        let random_value = f64::sqrt(2.0 / PI)
            * ok_hit_window
            * f64::exp(-0.5 * (ok_hit_window / deviation).powf(2.0))
            / (deviation * erf(ok_hit_window / (SQRT_2 * deviation)));

        deviation *= f64::sqrt(1.0 - random_value);

        // * Value deviation approach as greatCount approaches 0
        let limit_value = ok_hit_window / f64::sqrt(3.0);

        // * If precision is not enough to compute true deviation - use limit value
        if p_lower_bound == 0.0 || random_value >= 1.0 || deviation > limit_value {
            deviation = limit_value;
        }

        // * Then compute the variance for mehs.
        let meh_variance = (meh_hit_window * meh_hit_window
            + ok_hit_window * meh_hit_window
            + ok_hit_window * ok_hit_window)
            / 3.0;

        // * Find the total deviation.
        f64::sqrt(((great + ok) * deviation.powf(2.0) + meh * meh_variance) / (great + ok + meh))
    }

    // * Miss penalty assumes that a player will miss on the hardest parts of a map.
    fn miss_penalty(miss_count: f64, total_hits: f64) -> f64 {
        0.97 * (1.0 - (miss_count / total_hits).powf(0.775)).powf(miss_count.powf(0.875))
    }

    fn combo_scaling_factor(&self) -> f64 {
        if self.attrs.max_combo == 0 {
            1.0
        } else {
            (f64::from(self.state.max_combo).powf(0.8)
                / f64::from(self.attrs.max_combo).powf(0.8))
            .min(1.0)
        }
    }

    const fn total_hits(&self) -> f64 {
        self.state.total_hits() as f64
    }
}
