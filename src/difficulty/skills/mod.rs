use crate::{
    difficulty::object::DifficultyObject,
    model::{
        beatmap::{BeatmapAttributes, BeatmapAttributesBuilder},
        mods::GameMods,
    },
};

use self::{accuracy::Accuracy, aim::Aim, flashlight::Flashlight, speed::Speed};

pub mod accuracy;
pub mod aim;
pub mod flashlight;
pub mod speed;
pub mod strain;

/// Fade-in duration as a fraction of the preempt time under Hidden.
const HD_FADE_IN_DURATION_MULTIPLIER: f64 = 0.4;

/// All skills of one difficulty calculation.
pub struct Skills {
    pub aim: Aim,
    pub speed: Speed,
    pub accuracy: Accuracy,
    pub flashlight: Flashlight,
}

impl Skills {
    pub fn new(mods: &GameMods, map_attrs: &BeatmapAttributes) -> Self {
        let great_window = map_attrs.hit_windows.great;
        let time_preempt = map_attrs.hit_windows.preempt;

        let time_fade_in = if mods.hd() {
            time_preempt * HD_FADE_IN_DURATION_MULTIPLIER
        } else {
            400.0 * (time_preempt / BeatmapAttributesBuilder::PREEMPT_MIN).min(1.0)
        };

        Self {
            aim: Aim::new(),
            speed: Speed::new(2.0 * great_window, mods.ap()),
            accuracy: Accuracy::new(great_window),
            flashlight: Flashlight::new(mods, time_preempt, time_fade_in),
        }
    }

    pub fn process(&mut self, curr: &DifficultyObject<'_>, objects: &[DifficultyObject<'_>]) {
        self.aim.process(curr, objects);
        self.speed.process(curr, objects);
        self.accuracy.process(curr, objects);
        self.flashlight.process(curr, objects);
    }
}
