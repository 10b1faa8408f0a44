use crate::performance::Performance;

/// The result of a difficulty calculation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DifficultyAttributes {
    /// The difficulty of the aim skill.
    pub aim: f64,
    /// The difficulty of the speed skill.
    pub speed: f64,
    /// The difficulty of the accuracy skill.
    ///
    /// Derived from the timing deviation a player must stay below for a
    /// flawless run to be likely; tighter rhythm means a higher value.
    pub accuracy: f64,
    /// The difficulty of the flashlight skill.
    pub flashlight: f64,
    /// The number of clickable objects weighted by difficulty.
    pub speed_note_count: f64,
    /// The approach rate.
    pub ar: f64,
    /// The overall difficulty.
    pub od: f64,
    /// The health drain rate.
    pub hp: f64,
    /// The hit window for a great judgement in milliseconds.
    pub great_hit_window: f64,
    /// The hit window for an ok judgement in milliseconds.
    pub ok_hit_window: f64,
    /// The hit window for a meh judgement in milliseconds.
    pub meh_hit_window: f64,
    /// The amount of circles.
    pub n_circles: u32,
    /// The amount of sliders.
    pub n_sliders: u32,
    /// The amount of spinners.
    pub n_spinners: u32,
    /// The maximum combo.
    pub max_combo: u32,
    /// The final star rating.
    pub stars: f64,
}

/// Stable attribute IDs for callers that persist attributes in a columnar
/// key/value form. The IDs never change meaning across versions.
mod attribute_id {
    pub const AIM: u16 = 1;
    pub const SPEED: u16 = 3;
    pub const OD: u16 = 5;
    pub const AR: u16 = 7;
    pub const MAX_COMBO: u16 = 9;
    pub const STARS: u16 = 11;
    pub const GREAT_HIT_WINDOW: u16 = 13;
    pub const FLASHLIGHT: u16 = 17;
    pub const SPEED_NOTE_COUNT: u16 = 21;
    pub const ACCURACY: u16 = 23;
    pub const OK_HIT_WINDOW: u16 = 25;
    pub const MEH_HIT_WINDOW: u16 = 27;
}

impl DifficultyAttributes {
    /// Return the maximum combo.
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    /// Return the amount of hitobjects.
    pub const fn n_objects(&self) -> u32 {
        self.n_circles + self.n_sliders + self.n_spinners
    }

    /// Returns a builder for performance calculation.
    pub fn performance(self) -> Performance {
        self.into()
    }

    /// The attributes as `(id, value)` pairs for columnar persistence.
    ///
    /// Object counts and the drain rate are beatmap metadata rather than
    /// computed attributes and are not part of the mapping.
    pub fn to_database_attributes(&self) -> impl Iterator<Item = (u16, f64)> {
        use attribute_id as id;

        [
            (id::AIM, self.aim),
            (id::SPEED, self.speed),
            (id::OD, self.od),
            (id::AR, self.ar),
            (id::MAX_COMBO, f64::from(self.max_combo)),
            (id::STARS, self.stars),
            (id::GREAT_HIT_WINDOW, self.great_hit_window),
            (id::FLASHLIGHT, self.flashlight),
            (id::SPEED_NOTE_COUNT, self.speed_note_count),
            (id::ACCURACY, self.accuracy),
            (id::OK_HIT_WINDOW, self.ok_hit_window),
            (id::MEH_HIT_WINDOW, self.meh_hit_window),
        ]
        .into_iter()
    }

    /// Reconstruct attributes from `(id, value)` pairs produced by
    /// [`to_database_attributes`]; unknown IDs are ignored.
    ///
    /// Fields outside the mapping (object counts, drain rate) are left at
    /// their defaults and must be filled in by the caller if required.
    ///
    /// [`to_database_attributes`]: Self::to_database_attributes
    pub fn from_database_attributes(attributes: impl IntoIterator<Item = (u16, f64)>) -> Self {
        use attribute_id as id;

        let mut this = Self::default();

        for (attribute_id, value) in attributes {
            match attribute_id {
                id::AIM => this.aim = value,
                id::SPEED => this.speed = value,
                id::OD => this.od = value,
                id::AR => this.ar = value,
                id::MAX_COMBO => this.max_combo = value as u32,
                id::STARS => this.stars = value,
                id::GREAT_HIT_WINDOW => this.great_hit_window = value,
                id::FLASHLIGHT => this.flashlight = value,
                id::SPEED_NOTE_COUNT => this.speed_note_count = value,
                id::ACCURACY => this.accuracy = value,
                id::OK_HIT_WINDOW => this.ok_hit_window = value,
                id::MEH_HIT_WINDOW => this.meh_hit_window = value,
                _ => {}
            }
        }

        this
    }
}

/// The result of a performance calculation.
#[derive(Clone, Debug, PartialEq)]
pub struct PerformanceAttributes {
    /// The difficulty attributes that were used for the performance
    /// calculation.
    pub difficulty: DifficultyAttributes,
    /// The final performance points.
    pub pp: f64,
    /// The aim portion of the final pp.
    pub pp_aim: f64,
    /// The speed portion of the final pp.
    pub pp_speed: f64,
    /// The accuracy portion of the final pp.
    pub pp_acc: f64,
    /// The flashlight portion of the final pp.
    pub pp_flashlight: f64,
    /// Misses including an approximated amount of slider breaks.
    pub effective_miss_count: f64,
    /// The estimated timing deviation in milliseconds;
    /// [`f64::INFINITY`] when the score has no successful hits.
    pub deviation: f64,
    /// The deviation estimate restricted to speed-relevant notes.
    pub speed_deviation: f64,
}

impl PerformanceAttributes {
    /// Return the star value.
    pub const fn stars(&self) -> f64 {
        self.difficulty.stars
    }

    /// Return the performance point value.
    pub const fn pp(&self) -> f64 {
        self.pp
    }

    /// Return the maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        self.difficulty.max_combo
    }

    /// Returns a builder for another performance calculation on the same
    /// difficulty attributes.
    pub fn performance(self) -> Performance {
        self.difficulty.into()
    }
}

impl Default for PerformanceAttributes {
    fn default() -> Self {
        Self {
            difficulty: DifficultyAttributes::default(),
            pp: 0.0,
            pp_aim: 0.0,
            pp_speed: 0.0,
            pp_acc: 0.0,
            pp_flashlight: 0.0,
            effective_miss_count: 0.0,
            deviation: f64::INFINITY,
            speed_deviation: f64::INFINITY,
        }
    }
}

impl From<PerformanceAttributes> for DifficultyAttributes {
    fn from(attributes: PerformanceAttributes) -> Self {
        attributes.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_attributes_round_trip() {
        let attrs = DifficultyAttributes {
            aim: 3.2,
            speed: 2.8,
            accuracy: 4.1,
            flashlight: 1.5,
            speed_note_count: 213.4,
            ar: 9.3,
            od: 8.7,
            great_hit_window: 27.8,
            ok_hit_window: 70.4,
            meh_hit_window: 113.0,
            max_combo: 727,
            stars: 5.67,
            ..Default::default()
        };

        let restored =
            DifficultyAttributes::from_database_attributes(attrs.to_database_attributes());

        assert_eq!(restored, attrs);
    }
}
