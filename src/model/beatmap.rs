use crate::model::{hit_object::HitObject, mods::GameMods};

/// An in-memory beatmap: its hit objects in start-time order plus the
/// global difficulty settings.
///
/// Decoding beatmap files is not a concern of this crate; objects and
/// settings are expected to arrive from a beatmap-model collaborator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Beatmap {
    pub hit_objects: Vec<HitObject>,
    /// Approach rate.
    pub ar: f32,
    /// Overall difficulty.
    pub od: f32,
    /// Circle size.
    pub cs: f32,
    /// Health drain rate.
    pub hp: f32,
}

impl Beatmap {
    /// Returns a builder for [`BeatmapAttributes`] seeded with this map's
    /// base settings.
    pub fn attributes(&self) -> BeatmapAttributesBuilder {
        BeatmapAttributesBuilder::new(self)
    }
}

/// Summary of a beatmap's settings after mods and clock rate are applied.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatmapAttributes {
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The circle size.
    pub cs: f64,
    /// The health drain rate.
    pub hp: f64,
    /// The clock rate with respect to mods.
    pub clock_rate: f64,
    /// The hit windows.
    pub hit_windows: HitWindows,
}

/// AR and OD hit windows in milliseconds, adjusted for the clock rate.
///
/// The judgement windows are half-widths: a hit error of up to `great`
/// milliseconds to either side still counts as a great.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitWindows {
    /// Time from becoming visible until the hit, based on AR.
    pub preempt: f64,
    /// Hit window for a great judgement.
    pub great: f64,
    /// Hit window for an ok judgement.
    pub ok: f64,
    /// Hit window for a meh judgement.
    pub meh: f64,
}

/// A builder for [`BeatmapAttributes`].
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct BeatmapAttributesBuilder {
    ar: f64,
    od: f64,
    cs: f64,
    hp: f64,
    mods: GameMods,
    clock_rate: Option<f64>,
}

impl BeatmapAttributesBuilder {
    pub const PREEMPT_MIN: f64 = 450.0;
    const PREEMPT_MID: f64 = 1200.0;
    const PREEMPT_MAX: f64 = 1800.0;

    /// Create a new builder from the map's base settings.
    pub fn new(map: &Beatmap) -> Self {
        Self {
            ar: f64::from(map.ar),
            od: f64::from(map.od),
            cs: f64::from(map.cs),
            hp: f64::from(map.hp),
            mods: GameMods::DEFAULT,
            clock_rate: None,
        }
    }

    /// Specify the mods.
    pub fn mods(mut self, mods: impl Into<GameMods>) -> Self {
        self.mods = mods.into();

        self
    }

    /// Specify a custom clock rate, overriding the one implied by the mods.
    pub fn clock_rate(mut self, clock_rate: Option<f64>) -> Self {
        self.clock_rate = clock_rate;

        self
    }

    /// Calculate the [`BeatmapAttributes`].
    pub fn build(&self) -> BeatmapAttributes {
        let mods = &self.mods;
        let clock_rate = self.clock_rate.unwrap_or_else(|| mods.clock_rate());

        let multiplier = mods.od_ar_hp_multiplier();

        let ar = (self.ar * multiplier).min(10.0);
        let od = (self.od * multiplier).min(10.0);
        let hp = (self.hp * multiplier).min(10.0);

        let cs = if mods.hr() {
            (self.cs * 1.3).min(10.0)
        } else if mods.ez() {
            self.cs * 0.5
        } else {
            self.cs
        };

        let preempt = difficulty_range(
            ar,
            Self::PREEMPT_MAX,
            Self::PREEMPT_MID,
            Self::PREEMPT_MIN,
        ) / clock_rate;

        let hit_windows = HitWindows {
            preempt,
            great: difficulty_range(od, 80.0, 50.0, 20.0) / clock_rate,
            ok: difficulty_range(od, 140.0, 100.0, 60.0) / clock_rate,
            meh: difficulty_range(od, 200.0, 150.0, 100.0) / clock_rate,
        };

        // AR and OD are reported post-clock-rate, inverted from their
        // windows.
        let ar = if preempt > Self::PREEMPT_MID {
            (Self::PREEMPT_MAX - preempt) / 120.0
        } else {
            (Self::PREEMPT_MID - preempt) / 150.0 + 5.0
        };

        let od = (80.0 - hit_windows.great) / 6.0;

        BeatmapAttributes {
            ar,
            od,
            cs,
            hp,
            clock_rate,
            hit_windows,
        }
    }
}

/// Maps a difficulty value in `0..=10` onto its three-anchor range; 0 maps
/// to `min`, 5 to `mid`, 10 to `max`, linearly in between.
fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
    if difficulty > 5.0 {
        mid + (max - mid) * (difficulty - 5.0) / 5.0
    } else if difficulty < 5.0 {
        mid + (mid - min) * (difficulty - 5.0) / 5.0
    } else {
        mid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_windows_follow_od() {
        let map = Beatmap {
            od: 9.0,
            ..Default::default()
        };

        let attrs = map.attributes().build();

        assert!((attrs.hit_windows.great - 26.0).abs() < 1e-9);
        assert!((attrs.hit_windows.ok - 68.0).abs() < 1e-9);
        assert!((attrs.hit_windows.meh - 110.0).abs() < 1e-9);
        assert!((attrs.od - 9.0).abs() < 1e-9);
    }

    #[test]
    fn clock_rate_shrinks_windows() {
        let map = Beatmap {
            od: 5.0,
            ..Default::default()
        };

        let attrs = map.attributes().clock_rate(Some(1.5)).build();

        assert!((attrs.hit_windows.great - 50.0 / 1.5).abs() < 1e-9);
        assert!(attrs.od > 5.0);
    }
}
