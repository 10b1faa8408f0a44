use crate::model::pos::Pos;

/// One hit object of a beatmap, already decoded into memory.
#[derive(Clone, Debug, PartialEq)]
pub struct HitObject {
    /// Playfield position in pixels.
    pub pos: Pos,
    /// Start time in milliseconds.
    pub start_time: f64,
    /// What kind of object this is.
    pub kind: HitObjectKind,
}

/// The type of a [`HitObject`] along with the data the rating model needs.
#[derive(Clone, Debug, PartialEq)]
pub enum HitObjectKind {
    Circle,
    Slider {
        /// End time in milliseconds.
        end_time: f64,
        /// Amount of nested hits (ticks, repeats, and the tail); the head is
        /// not included.
        nested: u32,
    },
    Spinner {
        /// End time in milliseconds.
        end_time: f64,
    },
}

impl HitObject {
    /// Whether the object is a circle.
    pub const fn is_circle(&self) -> bool {
        matches!(self.kind, HitObjectKind::Circle)
    }

    /// Whether the object is a slider.
    pub const fn is_slider(&self) -> bool {
        matches!(self.kind, HitObjectKind::Slider { .. })
    }

    /// Whether the object is a spinner.
    pub const fn is_spinner(&self) -> bool {
        matches!(self.kind, HitObjectKind::Spinner { .. })
    }

    /// The time at which the object ends.
    pub const fn end_time(&self) -> f64 {
        match self.kind {
            HitObjectKind::Circle => self.start_time,
            HitObjectKind::Slider { end_time, .. } | HitObjectKind::Spinner { end_time } => {
                end_time
            }
        }
    }

    /// How much combo the object contributes in total.
    pub const fn combo(&self) -> u32 {
        match self.kind {
            HitObjectKind::Circle | HitObjectKind::Spinner { .. } => 1,
            HitObjectKind::Slider { nested, .. } => 1 + nested,
        }
    }
}
