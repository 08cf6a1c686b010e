pub mod beatmap;
pub mod difficulty;
pub mod mods;
pub mod performance;
pub mod player;
pub mod recommend;
