//! Configuration errors
//!
//! The simulation itself has no error paths: collisions and missed trains are
//! state transitions. Only loading a tuning file can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{section}.{field} must be positive (got {value})")]
    NonPositive {
        section: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("{section}.{field} range {min}..{max} is inverted")]
    InvertedRange {
        section: &'static str,
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("traffic needs at least two lanes so one can be out of service (got {0})")]
    TooFewLanes(usize),

    #[error("traffic start lane {lane} is outside 0..{lanes}")]
    StartLaneOutOfRange { lane: usize, lanes: usize },

    #[error("{section}.{field} probability {value} is outside [0, 1]")]
    Probability {
        section: &'static str,
        field: &'static str,
        value: f64,
    },
}
