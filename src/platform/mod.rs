//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (fixed timestep accumulator)
//! - Input events (key names to tick commands)

pub mod clock;
pub mod input;

pub use clock::FixedTimestep;
pub use input::{InputLatch, KeyCommand, map_key};
