//! Library to calculate difficulty and performance attributes for rhythm
//! game beatmaps.
//!
//! ## Description
//!
//! Given the geometric and timing layout of a beatmap, [`Difficulty`]
//! produces one scalar per skill describing how hard the map is
//! ([`DifficultyAttributes`]). Combined with a score's hit statistics,
//! [`Performance`] rates how well that score demonstrates each skill and
//! folds everything into a single pp value ([`PerformanceAttributes`]).
//!
//! Beatmaps are plain in-memory values; decoding files, rendering, and
//! storing results are concerns of the surrounding application.
//!
//! ## Usage
//!
//! ```
//! use rizumu_pp::{Beatmap, Difficulty, HitObject, HitObjectKind, Pos};
//!
//! let map = Beatmap {
//!     hit_objects: (0..64)
//!         .map(|i| HitObject {
//!             pos: Pos::new(64.0 + 8.0 * i as f32, 192.0),
//!             start_time: f64::from(i) * 220.0,
//!             kind: HitObjectKind::Circle,
//!         })
//!         .collect(),
//!     ar: 9.0,
//!     od: 8.5,
//!     cs: 4.0,
//!     hp: 5.0,
//! };
//!
//! // Calculate difficulty attributes
//! let diff_attrs = Difficulty::new()
//!     .mods(8 + 16) // HDHR
//!     .calculate(&map);
//!
//! let stars = diff_attrs.stars;
//!
//! // Calculate performance attributes
//! let perf_attrs = diff_attrs
//!     .performance()
//!     .mods(24) // HDHR, same as before
//!     .combo(38)
//!     .n100(2)
//!     .misses(1)
//!     .calculate();
//!
//! let pp = perf_attrs.pp;
//!
//! println!("Stars: {stars} | PP: {pp}");
//! ```
//!
//! ## Features
//!
//! | Flag | Description | Dependencies
//! | - | - | -
//! | `default` | No features |
//! | `tracing` | Iterative solvers that exhaust their iteration cap log a `tracing::debug` event before returning their best-effort result. | [`tracing`]
//!
//! [`tracing`]: https://docs.rs/tracing

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

mod attributes;
mod difficulty;
mod model;
mod performance;
mod util;

pub use rosu_mods;

pub use self::{
    attributes::{DifficultyAttributes, PerformanceAttributes},
    difficulty::Difficulty,
    model::{
        beatmap::{Beatmap, BeatmapAttributes, BeatmapAttributesBuilder, HitWindows},
        hit_object::{HitObject, HitObjectKind},
        mods::GameMods,
        pos::Pos,
    },
    performance::{Performance, ScoreState},
};
