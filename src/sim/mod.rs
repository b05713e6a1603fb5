//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - Timers run on the simulation clock, never the wall clock
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod level;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;
pub mod weather;

pub use collision::{CollisionEffect, Contact, Resolution};
pub use entity::{Obstacle, ObstacleClass, ObstacleKind, Player, Rect};
pub use level::{Goal, LevelConfig, LevelId, Movement};
pub use state::{Decor, GameOverCause, LevelEvent, LevelPhase, LevelState, Snapshot};
pub use tick::{Direction, TickInput, step, tick};
pub use timer::{TimerKind, Timers};
pub use weather::Raindrop;
