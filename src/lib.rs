//! Bengaluru Chronicles - a three-level obstacle dodging game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, level state machine)
//! - `game`: Level orchestration (level 1 -> transition -> level 2 -> transition -> level 3)
//! - `renderer`: Snapshot to draw-list conversion (and the browser canvas backend)
//! - `platform`: Fixed timestep driver and keyboard mapping
//! - `tuning`: Data-driven game balance
//! - `settings`: Presentation preferences

pub mod audio;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::TuningError;
pub use game::{Game, GameEvent, Stage};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Uniform sample in `[min, max)`; returns `min` for an empty range
#[inline]
pub fn lerp_range(min: f32, max: f32, t: f32) -> f32 {
    if max <= min { min } else { min + (max - min) * t }
}
