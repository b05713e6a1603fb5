//! Level state and the level state machine
//!
//! Welcome -> Playing -> {GameOver | LevelComplete}, GameOver -> Playing on
//! restart. Only `Playing` lets the simulation or input touch entities.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Obstacle, ObstacleKind, Player};
use super::level::{Goal, LevelConfig, LevelId, Movement};
use super::timer::{TimerKind, Timers};
use super::weather::Raindrop;
use crate::tuning::Tuning;

/// Stream offset for decorative randomness, kept apart from gameplay draws
const DECOR_STREAM: u64 = 0x5EED_DEC0;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Briefing screen, waiting for start
    Welcome,
    /// Active gameplay
    Playing,
    /// Attempt failed, waiting for restart
    GameOver,
    /// Goal reached; terminal for this level
    LevelComplete,
}

/// Why an attempt ended in failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Ran into a blocking obstacle
    Collision(ObstacleKind),
    /// The metro left before the player boarded
    TrainDeparted,
}

/// Notifications raised by a level, drained by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LevelEvent {
    /// Welcome -> Playing
    Started,
    /// GameOver -> Playing
    Restarted,
    /// Goal reached (raised once per attempt)
    Completed,
    /// Attempt failed (raised once per attempt)
    Failed(GameOverCause),
    /// A bonus obstacle was consumed
    BonusCollected { obstacle_id: u32, boost: f32 },
}

/// Presentation-only state; never read by collision or win checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decor {
    pub raining: bool,
    pub rain: Vec<Raindrop>,
    /// Control hint, hidden after the first move
    pub instructions_visible: bool,
    /// Train door highlight near the end of the platform
    pub door_lit: bool,
}

impl Decor {
    fn fresh() -> Self {
        Self {
            instructions_visible: true,
            ..Default::default()
        }
    }
}

/// Read-only view handed to renderers each frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub level: LevelId,
    pub phase: LevelPhase,
    pub playfield: Vec2,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub lane_count: Option<usize>,
    pub blocked_lane: Option<usize>,
    pub decor: &'a Decor,
    pub progress: f32,
    pub game_over_cause: Option<GameOverCause>,
    pub attempt: u32,
}

/// Complete state of one level instance
#[derive(Debug, Clone)]
pub struct LevelState {
    pub config: LevelConfig,
    /// Seed this level was created with
    pub seed: u64,
    pub phase: LevelPhase,
    pub player: Player,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Out-of-service lane for the current attempt
    pub blocked_lane: Option<usize>,
    /// Simulation clock of the current attempt
    pub elapsed_ms: f64,
    pub last_spawn_ms: f64,
    pub spawn_count: u32,
    pub time_ticks: u64,
    /// Attempts started so far (1 after the first start)
    pub attempt: u32,
    pub game_over_cause: Option<GameOverCause>,
    pub decor: Decor,
    pub(crate) timers: Timers,
    pub(crate) rng: Pcg32,
    pub(crate) decor_rng: Pcg32,
    events: Vec<LevelEvent>,
    next_id: u32,
}

impl LevelState {
    /// Create a level waiting on its welcome screen
    pub fn new(config: LevelConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let blocked_lane = roll_blocked_lane(&config, &mut rng);
        let player = config.spawn_player();
        Self {
            config,
            seed,
            phase: LevelPhase::Welcome,
            player,
            obstacles: Vec::new(),
            blocked_lane,
            elapsed_ms: 0.0,
            last_spawn_ms: 0.0,
            spawn_count: 0,
            time_ticks: 0,
            attempt: 0,
            game_over_cause: None,
            decor: Decor::fresh(),
            timers: Timers::new(),
            rng,
            decor_rng: Pcg32::seed_from_u64(seed ^ DECOR_STREAM),
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn for_level(id: LevelId, tuning: &Tuning, seed: u64) -> Self {
        Self::new(LevelConfig::for_level(id, tuning), seed)
    }

    pub fn id(&self) -> LevelId {
        self.config.id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == LevelPhase::Playing
    }

    /// Welcome -> Playing. Returns false from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != LevelPhase::Welcome {
            return false;
        }
        self.begin_attempt(false);
        log::info!(
            "Level {} ({}) started, attempt {}",
            self.id().number(),
            self.id().name(),
            self.attempt
        );
        self.events.push(LevelEvent::Started);
        true
    }

    /// GameOver -> Playing with a full reset, including a fresh blocked lane.
    /// Returns false from any other phase.
    pub fn restart(&mut self) -> bool {
        if self.phase != LevelPhase::GameOver {
            return false;
        }
        self.begin_attempt(true);
        log::info!(
            "Level {} restarted, attempt {}",
            self.id().number(),
            self.attempt
        );
        self.events.push(LevelEvent::Restarted);
        true
    }

    fn begin_attempt(&mut self, reroll: bool) {
        self.timers.cancel_all();
        self.player = self.config.spawn_player();
        self.obstacles.clear();
        self.elapsed_ms = 0.0;
        self.last_spawn_ms = 0.0;
        self.spawn_count = 0;
        self.time_ticks = 0;
        self.game_over_cause = None;
        self.decor = Decor::fresh();
        if reroll {
            self.blocked_lane = roll_blocked_lane(&self.config, &mut self.rng);
        }
        if let Some(lane) = self.blocked_lane {
            log::debug!("Lane {} is out of service", lane);
        }
        if let Some(train) = self.config.train {
            if self.rng.random_bool(train.departure_chance) {
                let due = train.min_departure_ms
                    + (train.max_departure_ms - train.min_departure_ms)
                        * self.rng.random::<f64>();
                self.timers.schedule(TimerKind::TrainDeparture, due);
                log::info!("The train will leave early at {:.0} ms", due);
            }
        }
        self.attempt += 1;
        self.phase = LevelPhase::Playing;
    }

    /// Playing -> GameOver
    pub(crate) fn fail(&mut self, cause: GameOverCause) {
        if self.phase != LevelPhase::Playing {
            return;
        }
        self.leave_playing(LevelPhase::GameOver);
        self.game_over_cause = Some(cause);
        match cause {
            GameOverCause::Collision(kind) => {
                log::info!("Level {} over: hit {}", self.id().number(), kind.as_str())
            }
            GameOverCause::TrainDeparted => {
                log::info!("Level {} over: the train left", self.id().number())
            }
        }
        self.events.push(LevelEvent::Failed(cause));
    }

    /// Playing -> LevelComplete
    pub(crate) fn complete(&mut self) {
        if self.phase != LevelPhase::Playing {
            return;
        }
        self.leave_playing(LevelPhase::LevelComplete);
        log::info!(
            "Level {} complete after {} ticks",
            self.id().number(),
            self.time_ticks
        );
        self.events.push(LevelEvent::Completed);
    }

    fn leave_playing(&mut self, phase: LevelPhase) {
        // Nothing scheduled during this attempt may fire into a later one
        self.timers.cancel_all();
        self.decor.raining = false;
        self.decor.rain.clear();
        self.phase = phase;
    }

    pub(crate) fn push_event(&mut self, event: LevelEvent) {
        self.events.push(event);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[LevelEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the player may move into `lane`
    pub fn can_enter_lane(&self, lane: usize) -> bool {
        match self.config.movement {
            Movement::Lanes { count, .. } => lane < count && Some(lane) != self.blocked_lane,
            Movement::Falling { .. } => false,
        }
    }

    /// Fraction of the level covered, in [0, 1]
    pub fn progress(&self) -> f32 {
        let rect = self.player.rect();
        let p = match self.config.goal {
            Goal::RightEdgeAt(goal_x) => {
                let length = match self.config.train {
                    Some(train) => train.platform_length - (self.config.playfield.x - goal_x),
                    None => goal_x,
                };
                rect.right() / length
            }
            Goal::TopEdgeAt(goal_y) => {
                let span = self.config.player_start.y - goal_y;
                if span <= 0.0 {
                    1.0
                } else {
                    (self.config.player_start.y - rect.top()) / span
                }
            }
        };
        p.clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            level: self.id(),
            phase: self.phase,
            playfield: self.config.playfield,
            player: &self.player,
            obstacles: &self.obstacles,
            lane_count: self.config.movement.lane_count(),
            blocked_lane: self.blocked_lane,
            decor: &self.decor,
            progress: self.progress(),
            game_over_cause: self.game_over_cause,
            attempt: self.attempt,
        }
    }
}

/// Pick an out-of-service lane, never the player's start lane
fn roll_blocked_lane(config: &LevelConfig, rng: &mut Pcg32) -> Option<usize> {
    if !config.blocked_lane {
        return None;
    }
    let Movement::Lanes {
        count, start_lane, ..
    } = config.movement
    else {
        return None;
    };
    if count < 2 {
        return None;
    }
    let mut lane = rng.random_range(0..count - 1);
    if lane >= start_lane {
        lane += 1;
    }
    Some(lane)
}
