use crate::{
    attributes::DifficultyAttributes,
    model::{
        beatmap::{Beatmap, HitWindows},
        mods::GameMods,
    },
    performance::PERFORMANCE_BASE_MULTIPLIER,
};

use self::{object::DifficultyObject, scaling_factor::ScalingFactor, skills::Skills};

pub mod object;
pub mod scaling_factor;
pub mod skills;

const DIFFICULTY_MULTIPLIER: f64 = 0.0675;

pub(crate) const HD_FADE_OUT_DURATION_MULTIPLIER: f64 = 0.3;

/// Difficulty calculator.
///
/// # Example
///
/// ```
/// use rizumu_pp::{Beatmap, Difficulty};
///
/// let map = Beatmap::default();
///
/// let attrs = Difficulty::new()
///     .mods(8 + 16) // HDHR
///     .calculate(&map);
/// # let _ = attrs;
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Difficulty {
    mods: GameMods,
    clock_rate: Option<f64>,
}

impl Difficulty {
    pub fn new() -> Self {
        Self {
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
    ///
    /// # Panics
    ///
    /// Panics if the clock rate is not a finite positive number.
    pub fn clock_rate(mut self, clock_rate: f64) -> Self {
        assert!(
            clock_rate.is_finite() && clock_rate > 0.0,
            "invalid clock rate {clock_rate}"
        );

        self.clock_rate = Some(clock_rate);

        self
    }

    /// Perform the difficulty calculation.
    pub fn calculate(&self, map: &Beatmap) -> DifficultyAttributes {
        let map_attrs = map
            .attributes()
            .mods(self.mods.clone())
            .clock_rate(self.clock_rate)
            .build();

        let scaling_factor = ScalingFactor::new(map_attrs.cs);

        let mut attrs = DifficultyAttributes {
            ar: map_attrs.ar,
            od: map_attrs.od,
            hp: map_attrs.hp,
            great_hit_window: map_attrs.hit_windows.great,
            ok_hit_window: map_attrs.hit_windows.ok,
            meh_hit_window: map_attrs.hit_windows.meh,
            ..Default::default()
        };

        for h in map.hit_objects.iter() {
            if h.is_circle() {
                attrs.n_circles += 1;
            } else if h.is_slider() {
                attrs.n_sliders += 1;
            } else {
                attrs.n_spinners += 1;
            }

            attrs.max_combo += h.combo();
        }

        let diff_objects = Self::create_difficulty_objects(
            map,
            &scaling_factor,
            map_attrs.clock_rate,
            map_attrs.hit_windows,
        );

        let mut skills = Skills::new(&self.mods, &map_attrs);

        for curr in diff_objects.iter() {
            skills.process(curr, &diff_objects);
        }

        let Skills {
            aim,
            speed,
            accuracy,
            flashlight,
        } = skills;

        let speed_relevant_note_count = speed.relevant_note_count();

        Self::eval(
            &mut attrs,
            &self.mods,
            aim.difficulty_value(),
            speed.difficulty_value(),
            speed_relevant_note_count,
            accuracy.difficulty_value(),
            flashlight.difficulty_value(),
        );

        attrs
    }

    /// Process the skill values and store the results in `attrs`.
    fn eval(
        attrs: &mut DifficultyAttributes,
        mods: &GameMods,
        aim_difficulty_value: f64,
        speed_difficulty_value: f64,
        speed_relevant_note_count: f64,
        accuracy_rating: f64,
        flashlight_difficulty_value: f64,
    ) {
        let mut aim_rating = aim_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut speed_rating = speed_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut flashlight_rating = flashlight_difficulty_value.sqrt() * DIFFICULTY_MULTIPLIER;
        let mut accuracy_rating = accuracy_rating;

        if mods.td() {
            aim_rating = aim_rating.powf(0.8);
            flashlight_rating = flashlight_rating.powf(0.8);
        }

        if mods.rx() {
            // Taps are auto-timed under Relax.
            aim_rating *= 0.9;
            speed_rating = 0.0;
            accuracy_rating = 0.0;
            flashlight_rating *= 0.7;
        }

        let base_aim_performance = (5.0 * (aim_rating / 0.0675).max(1.0) - 4.0).powi(3) / 100_000.0;
        let base_speed_performance =
            (5.0 * (speed_rating / 0.0675).max(1.0) - 4.0).powi(3) / 100_000.0;

        let base_flashlight_performance = if mods.fl() {
            flashlight_rating.powi(2) * 25.0
        } else {
            0.0
        };

        let base_performance = ((base_aim_performance).powf(1.1)
            + (base_speed_performance).powf(1.1)
            + (base_flashlight_performance).powf(1.1))
        .powf(1.0 / 1.1);

        let star_rating = if base_performance > 0.00001 {
            PERFORMANCE_BASE_MULTIPLIER.cbrt()
                * 0.027
                * ((100_000.0 / 2.0_f64.powf(1.0 / 1.1) * base_performance).cbrt() + 4.0)
        } else {
            0.0
        };

        attrs.aim = aim_rating;
        attrs.speed = speed_rating;
        attrs.accuracy = accuracy_rating;
        attrs.flashlight = flashlight_rating;
        attrs.speed_note_count = speed_relevant_note_count;
        attrs.stars = star_rating;
    }

    fn create_difficulty_objects<'a>(
        map: &'a Beatmap,
        scaling_factor: &ScalingFactor,
        clock_rate: f64,
        hit_windows: HitWindows,
    ) -> Vec<DifficultyObject<'a>> {
        // The first hit object generates no difficulty object.
        map.hit_objects
            .iter()
            .skip(1)
            .enumerate()
            .map(|(idx, h)| {
                let last = &map.hit_objects[idx];
                let last_last = idx.checked_sub(1).map(|i| &map.hit_objects[i]);

                DifficultyObject::new(
                    h,
                    last,
                    last_last,
                    clock_rate,
                    idx,
                    scaling_factor,
                    hit_windows,
                )
            })
            .collect()
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new()
    }
}
