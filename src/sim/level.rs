//! Per-level configuration
//!
//! The three levels share one simulation step. Everything that differs between
//! them (movement axis, obstacle table, spawn cadence, goal, timed hazards)
//! is captured by a `LevelConfig` built from the tuning table.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{ObstacleKind, Player};
use crate::tuning::{RainTuning, Tuning};

/// The three levels, in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelId {
    TrafficDodge,
    MetroRush,
    Finale,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::TrafficDodge, LevelId::MetroRush, LevelId::Finale];

    /// 1-based level number
    pub fn number(&self) -> u32 {
        match self {
            LevelId::TrafficDodge => 1,
            LevelId::MetroRush => 2,
            LevelId::Finale => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LevelId::TrafficDodge => "Traffic Dodge",
            LevelId::MetroRush => "Namma Metro Rush",
            LevelId::Finale => "RCB Finale",
        }
    }

    /// Welcome-screen briefing
    pub fn briefing(&self) -> &'static str {
        match self {
            LevelId::TrafficDodge => {
                "Reach the end of the road. Use Up/Down to dodge. Avoid the Out of Service lane."
            }
            LevelId::MetroRush => {
                "Reach the Metro train. Use Left/Right to move. Avoid the crowd and the police; a tea stall gives you a boost."
            }
            LevelId::Finale => "Reach the trophy. Use Left/Right to move. Avoid the CSK logo.",
        }
    }

    pub fn next(&self) -> Option<LevelId> {
        match self {
            LevelId::TrafficDodge => Some(LevelId::MetroRush),
            LevelId::MetroRush => Some(LevelId::Finale),
            LevelId::Finale => None,
        }
    }
}

/// How the player and obstacles move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Movement {
    /// Player runs right at a constant speed and switches lanes with Up/Down;
    /// obstacles scroll in from the right edge
    Lanes {
        count: usize,
        lane_height: f32,
        start_lane: usize,
        forward_speed: f32,
    },
    /// Player steps with Left/Right (and optionally climbs upward on its own);
    /// obstacles fall from the top
    Falling { step: f32, climb_speed: f32 },
}

impl Movement {
    pub fn is_lane_based(&self) -> bool {
        matches!(self, Movement::Lanes { .. })
    }

    pub fn lane_count(&self) -> Option<usize> {
        match self {
            Movement::Lanes { count, .. } => Some(*count),
            Movement::Falling { .. } => None,
        }
    }
}

/// Win condition, checked at the start of every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Goal {
    /// Player's right edge reaches `x`
    RightEdgeAt(f32),
    /// Player's top edge rises to `y`
    TopEdgeAt(f32),
}

impl Goal {
    pub fn reached(&self, player: &Player) -> bool {
        match *self {
            Goal::RightEdgeAt(x) => player.rect().right() >= x,
            Goal::TopEdgeAt(y) => player.rect().top() <= y,
        }
    }
}

/// One entry of a level's obstacle table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    /// Speed is drawn uniformly from `min_speed..max_speed` at spawn
    pub min_speed: f32,
    pub max_speed: f32,
}

impl ObstacleSpec {
    pub fn fixed(kind: ObstacleKind, speed: f32) -> Self {
        Self {
            kind,
            min_speed: speed,
            max_speed: speed,
        }
    }

    pub fn ranged(kind: ObstacleKind, min_speed: f32, max_speed: f32) -> Self {
        Self {
            kind,
            min_speed,
            max_speed,
        }
    }
}

/// Where falling obstacles enter the playfield
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallBand {
    /// Leftmost x of the band
    pub min_x: f32,
    /// Band width; obstacles lie fully inside it
    pub width: f32,
    /// Spawn height (negative starts above the playfield)
    pub spawn_y: f32,
}

/// Spawn cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    /// A spawn happens once strictly more than this has elapsed since the last
    pub interval_ms: f64,
    /// Cap on spawns per attempt
    pub max_spawns: Option<u32>,
}

/// Level 2's train: progress bar, blinking door and the random early departure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainRule {
    pub departure_chance: f64,
    pub min_departure_ms: f64,
    pub max_departure_ms: f64,
    pub platform_length: f32,
    pub door_blink_ms: f64,
}

/// Everything the simulation step needs to know about a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: LevelId,
    pub playfield: Vec2,
    pub player_size: Vec2,
    /// Top-left of the player at the start of every attempt
    pub player_start: Vec2,
    pub movement: Movement,
    pub obstacle_size: Vec2,
    pub obstacles: Vec<ObstacleSpec>,
    /// Spawn band for falling obstacles (unused on lane levels)
    pub fall_band: Option<FallBand>,
    pub spawn: SpawnRule,
    pub goal: Goal,
    /// Forward boost granted by bonus obstacles
    pub bonus_boost: f32,
    /// Pick one lane per attempt that neither player nor traffic may use
    pub blocked_lane: bool,
    pub train: Option<TrainRule>,
    pub rain: Option<RainTuning>,
}

impl LevelConfig {
    pub fn for_level(id: LevelId, tuning: &Tuning) -> Self {
        match id {
            LevelId::TrafficDodge => Self::traffic_dodge(tuning),
            LevelId::MetroRush => Self::metro_rush(tuning),
            LevelId::Finale => Self::finale(tuning),
        }
    }

    pub fn traffic_dodge(tuning: &Tuning) -> Self {
        let t = &tuning.traffic;
        let player_size = Vec2::new(t.player_width, t.player_height);
        let mut config = Self {
            id: LevelId::TrafficDodge,
            playfield: Vec2::new(t.width, t.lanes as f32 * t.lane_height),
            player_size,
            player_start: Vec2::ZERO,
            movement: Movement::Lanes {
                count: t.lanes,
                lane_height: t.lane_height,
                start_lane: t.start_lane,
                forward_speed: t.forward_speed,
            },
            obstacle_size: Vec2::new(tuning.obstacle.width, tuning.obstacle.height),
            obstacles: vec![
                ObstacleSpec::fixed(ObstacleKind::Zepto, t.zepto_speed),
                ObstacleSpec::fixed(ObstacleKind::Auto, t.auto_speed),
                ObstacleSpec::fixed(ObstacleKind::Cow, t.cow_speed),
            ],
            fall_band: None,
            spawn: SpawnRule {
                interval_ms: t.spawn_interval_ms,
                max_spawns: None,
            },
            goal: Goal::RightEdgeAt(t.distance - t.finish_margin),
            bonus_boost: 0.0,
            blocked_lane: true,
            train: None,
            rain: Some(t.rain.clone()),
        };
        config.player_start = Vec2::new(t.start_x, config.lane_top(t.start_lane, t.player_height));
        config
    }

    pub fn metro_rush(tuning: &Tuning) -> Self {
        let m = &tuning.metro;
        Self {
            id: LevelId::MetroRush,
            playfield: Vec2::new(m.width, m.height),
            player_size: Vec2::new(m.player_width, m.player_height),
            player_start: Vec2::new(m.start_x, m.start_y),
            movement: Movement::Falling {
                step: m.step,
                climb_speed: 0.0,
            },
            obstacle_size: Vec2::new(tuning.obstacle.width, tuning.obstacle.height),
            obstacles: [
                ObstacleKind::Crowd,
                ObstacleKind::TeaStall,
                ObstacleKind::Watchman,
                ObstacleKind::Police,
            ]
            .into_iter()
            .map(|kind| ObstacleSpec::ranged(kind, m.min_fall_speed, m.max_fall_speed))
            .collect(),
            fall_band: Some(FallBand {
                min_x: 0.0,
                width: m.width,
                spawn_y: -tuning.obstacle.height,
            }),
            spawn: SpawnRule {
                interval_ms: m.spawn_interval_ms,
                max_spawns: None,
            },
            goal: Goal::RightEdgeAt(m.width - m.finish_margin),
            bonus_boost: m.teastall_boost,
            blocked_lane: false,
            train: Some(TrainRule {
                departure_chance: m.departure_chance,
                min_departure_ms: m.min_departure_ms,
                max_departure_ms: m.max_departure_ms,
                platform_length: m.platform_length,
                door_blink_ms: m.door_blink_ms,
            }),
            rain: None,
        }
    }

    pub fn finale(tuning: &Tuning) -> Self {
        let f = &tuning.finale;
        let pitch_width = f.width * f.pitch_ratio;
        Self {
            id: LevelId::Finale,
            playfield: Vec2::new(f.width, f.height),
            player_size: Vec2::new(f.player_width, f.player_height),
            player_start: Vec2::new(
                f.width / 2.0 - f.player_width / 2.0,
                f.height - f.player_height - f.start_bottom_margin,
            ),
            movement: Movement::Falling {
                step: f.step,
                climb_speed: f.climb_speed,
            },
            obstacle_size: Vec2::new(tuning.obstacle.width, tuning.obstacle.height),
            obstacles: vec![ObstacleSpec::ranged(
                ObstacleKind::Csk,
                f.min_csk_speed,
                f.max_csk_speed,
            )],
            fall_band: Some(FallBand {
                min_x: f.width / 2.0 - pitch_width / 2.0,
                width: pitch_width,
                spawn_y: 0.0,
            }),
            spawn: SpawnRule {
                interval_ms: f.spawn_interval_ms,
                max_spawns: Some(f.max_spawns),
            },
            goal: Goal::TopEdgeAt(f.trophy_threshold),
            bonus_boost: 0.0,
            blocked_lane: false,
            train: None,
            rain: None,
        }
    }

    /// Top y that vertically centres an item of `height` inside `lane`
    pub fn lane_top(&self, lane: usize, height: f32) -> f32 {
        match self.movement {
            Movement::Lanes { lane_height, .. } => {
                lane as f32 * lane_height + (lane_height - height) / 2.0
            }
            Movement::Falling { .. } => 0.0,
        }
    }

    pub fn start_lane(&self) -> Option<usize> {
        match self.movement {
            Movement::Lanes { start_lane, .. } => Some(start_lane),
            Movement::Falling { .. } => None,
        }
    }

    /// Fresh player at the attempt start position
    pub fn spawn_player(&self) -> Player {
        Player {
            pos: self.player_start,
            size: self.player_size,
            lane: self.start_lane(),
        }
    }

    /// Obstacles beyond this boundary have left the playfield for good
    pub fn is_off_playfield(&self, rect_left: f32, rect_top: f32) -> bool {
        match self.movement {
            Movement::Lanes { .. } => rect_left + self.obstacle_size.x <= 0.0,
            Movement::Falling { .. } => rect_top >= self.playfield.y + self.obstacle_size.y,
        }
    }
}
