pub mod beatmap;
pub mod hit_object;
pub mod mods;
pub mod pos;
