//! Data-driven game balance
//!
//! Every gameplay constant lives here. `Tuning::default()` is the shipped
//! balance; a JSON override only needs the fields it changes.
//!
//! Distances are in playfield units (pixels), speeds in units per second,
//! durations in milliseconds. Per-tick chances assume the fixed 60 Hz step.

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Rain shower parameters (decorative only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainTuning {
    /// Chance per tick that a shower starts while dry
    pub start_chance: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    /// New drops added every tick while raining
    pub drops_per_tick: usize,
    pub min_length: f32,
    pub max_length: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_opacity: f32,
    pub max_opacity: f32,
    /// Drops are discarded once this far below the playfield
    pub overscan: f32,
}

impl Default for RainTuning {
    fn default() -> Self {
        Self {
            start_chance: 0.003,
            min_duration_ms: 3000.0,
            max_duration_ms: 6000.0,
            drops_per_tick: 6,
            min_length: 20.0,
            max_length: 40.0,
            min_speed: 480.0,
            max_speed: 720.0,
            min_opacity: 0.3,
            max_opacity: 0.8,
            overscan: 80.0,
        }
    }
}

/// Level 1: Traffic Dodge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficTuning {
    pub width: f32,
    pub lanes: usize,
    pub lane_height: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub start_lane: usize,
    pub start_x: f32,
    /// Constant forward speed of the player
    pub forward_speed: f32,
    /// Length of the road
    pub distance: f32,
    /// The level ends once the player's right edge is this close to `distance`
    pub finish_margin: f32,
    pub spawn_interval_ms: f64,
    pub zepto_speed: f32,
    pub auto_speed: f32,
    pub cow_speed: f32,
    pub rain: RainTuning,
}

impl Default for TrafficTuning {
    fn default() -> Self {
        Self {
            width: 1100.0,
            lanes: 5,
            lane_height: 120.0,
            player_width: 120.0,
            player_height: 100.0,
            start_lane: 2,
            start_x: 30.0,
            forward_speed: 240.0,
            distance: 1050.0,
            finish_margin: 10.0,
            spawn_interval_ms: 700.0,
            zepto_speed: 420.0,
            auto_speed: 240.0,
            cow_speed: 180.0,
            rain: RainTuning::default(),
        }
    }
}

/// Level 2: Namma Metro Rush
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetroTuning {
    pub width: f32,
    pub height: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub start_x: f32,
    /// Vertical position of the platform row the player walks along
    pub start_y: f32,
    /// Horizontal distance moved per key press
    pub step: f32,
    /// The level ends once the player's right edge is this close to `width`
    pub finish_margin: f32,
    pub spawn_interval_ms: f64,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
    /// Forward boost granted by a tea stall
    pub teastall_boost: f32,
    /// Chance per attempt that the train leaves early
    pub departure_chance: f64,
    pub min_departure_ms: f64,
    pub max_departure_ms: f64,
    /// Platform length used for the progress bar
    pub platform_length: f32,
    pub door_blink_ms: f64,
}

impl Default for MetroTuning {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 600.0,
            player_width: 120.0,
            player_height: 100.0,
            start_x: 30.0,
            start_y: 370.0,
            step: 10.0,
            finish_margin: 40.0,
            spawn_interval_ms: 500.0,
            min_fall_speed: 300.0,
            max_fall_speed: 480.0,
            teastall_boost: 60.0,
            departure_chance: 0.1,
            min_departure_ms: 6000.0,
            max_departure_ms: 10000.0,
            platform_length: 2200.0,
            door_blink_ms: 400.0,
        }
    }
}

/// Level 3: RCB Finale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinaleTuning {
    pub width: f32,
    pub height: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Gap kept between the player's feet and the bottom edge at start
    pub start_bottom_margin: f32,
    pub step: f32,
    /// Upward speed toward the trophy
    pub climb_speed: f32,
    /// Reaching this height wins the level
    pub trophy_threshold: f32,
    pub spawn_interval_ms: f64,
    pub max_spawns: u32,
    /// Width of the pitch band obstacles fall in, as a fraction of `width`
    pub pitch_ratio: f32,
    pub min_csk_speed: f32,
    pub max_csk_speed: f32,
}

impl Default for FinaleTuning {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 600.0,
            player_width: 80.0,
            player_height: 100.0,
            start_bottom_margin: 20.0,
            step: 8.0,
            climb_speed: 180.0,
            trophy_threshold: 50.0,
            spawn_interval_ms: 2000.0,
            max_spawns: 2,
            pitch_ratio: 0.15,
            min_csk_speed: 180.0,
            max_csk_speed: 240.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub obstacle: ObstacleTuning,
    /// Length of the "get ready" screen between levels
    pub transition_ms: f64,
    pub traffic: TrafficTuning,
    pub metro: MetroTuning,
    pub finale: FinaleTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            obstacle: ObstacleTuning::default(),
            transition_ms: 2000.0,
            traffic: TrafficTuning::default(),
            metro: MetroTuning::default(),
            finale: FinaleTuning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            width: 40.0,
            height: 40.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning override");
        Ok(tuning)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Reading tuning from {}", path.as_ref().display());
        Self::from_json(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("obstacle", "width", self.obstacle.width)?;
        positive("obstacle", "height", self.obstacle.height)?;
        if self.transition_ms < 0.0 {
            return Err(TuningError::NonPositive {
                section: "tuning",
                field: "transition_ms",
                value: self.transition_ms,
            });
        }

        let t = &self.traffic;
        if t.lanes < 2 {
            return Err(TuningError::TooFewLanes(t.lanes));
        }
        if t.start_lane >= t.lanes {
            return Err(TuningError::StartLaneOutOfRange {
                lane: t.start_lane,
                lanes: t.lanes,
            });
        }
        positive("traffic", "width", t.width)?;
        positive("traffic", "lane_height", t.lane_height)?;
        positive("traffic", "forward_speed", t.forward_speed)?;
        positive("traffic", "spawn_interval_ms", t.spawn_interval_ms as f32)?;
        positive("traffic", "zepto_speed", t.zepto_speed)?;
        positive("traffic", "auto_speed", t.auto_speed)?;
        positive("traffic", "cow_speed", t.cow_speed)?;
        chance("traffic.rain", "start_chance", t.rain.start_chance)?;
        ordered(
            "traffic.rain",
            "duration_ms",
            t.rain.min_duration_ms,
            t.rain.max_duration_ms,
        )?;
        ordered(
            "traffic.rain",
            "speed",
            t.rain.min_speed.into(),
            t.rain.max_speed.into(),
        )?;

        let m = &self.metro;
        positive("metro", "width", m.width)?;
        positive("metro", "height", m.height)?;
        positive("metro", "step", m.step)?;
        positive("metro", "min_fall_speed", m.min_fall_speed)?;
        positive("metro", "spawn_interval_ms", m.spawn_interval_ms as f32)?;
        ordered(
            "metro",
            "fall_speed",
            m.min_fall_speed.into(),
            m.max_fall_speed.into(),
        )?;
        chance("metro", "departure_chance", m.departure_chance)?;
        ordered(
            "metro",
            "departure_ms",
            m.min_departure_ms,
            m.max_departure_ms,
        )?;

        let f = &self.finale;
        positive("finale", "width", f.width)?;
        positive("finale", "height", f.height)?;
        positive("finale", "step", f.step)?;
        positive("finale", "climb_speed", f.climb_speed)?;
        positive("finale", "min_csk_speed", f.min_csk_speed)?;
        positive("finale", "spawn_interval_ms", f.spawn_interval_ms as f32)?;
        positive("finale", "pitch_ratio", f.pitch_ratio)?;
        ordered(
            "finale",
            "csk_speed",
            f.min_csk_speed.into(),
            f.max_csk_speed.into(),
        )?;

        Ok(())
    }
}

fn positive(section: &'static str, field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive {
            section,
            field,
            value: value.into(),
        })
    }
}

fn ordered(
    section: &'static str,
    field: &'static str,
    min: f64,
    max: f64,
) -> Result<(), TuningError> {
    if min <= max {
        Ok(())
    } else {
        Err(TuningError::InvertedRange {
            section,
            field,
            min,
            max,
        })
    }
}

fn chance(section: &'static str, field: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::Probability {
            section,
            field,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.traffic.lanes, 5);
        assert_eq!(tuning.metro.teastall_boost, 60.0);
        assert_eq!(tuning.finale.max_spawns, 2);
        assert_eq!(tuning.transition_ms, 2000.0);
    }

    #[test]
    fn test_missing_file() {
        let err = Tuning::from_file("/nonexistent/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "traffic": { "lanes": 4 }, "transition_ms": 500 }"#)
            .expect("valid override");
        assert_eq!(tuning.traffic.lanes, 4);
        assert_eq!(tuning.traffic.lane_height, 120.0);
        assert_eq!(tuning.transition_ms, 500.0);
        assert_eq!(tuning.metro, MetroTuning::default());
    }

    #[test]
    fn test_rejects_single_lane() {
        let err = Tuning::from_json(r#"{ "traffic": { "lanes": 1, "start_lane": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::TooFewLanes(1)));
    }

    #[test]
    fn test_rejects_start_lane_outside_road() {
        let err = Tuning::from_json(r#"{ "traffic": { "start_lane": 7 } }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::StartLaneOutOfRange { lane: 7, lanes: 5 }
        ));
    }

    #[test]
    fn test_rejects_inverted_speed_range() {
        let err = Tuning::from_json(r#"{ "metro": { "min_fall_speed": 500, "max_fall_speed": 100 } }"#)
            .unwrap_err();
        assert!(matches!(err, TuningError::InvertedRange { section: "metro", .. }));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "metro": { "departure_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Probability { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("failed to parse tuning JSON"));
    }
}
