//! Level orchestration
//!
//! Runs the three levels in order with a short non-interactive transition
//! between them. A failure anywhere ends the run on a game-over screen whose
//! only way out is a fresh run from Level 1. Nothing carries over between
//! levels: each one is built from scratch with its own seed.

use crate::sim::{GameOverCause, LevelEvent, LevelId, LevelPhase, LevelState, TickInput, tick};
use crate::tuning::Tuning;

/// Where the run currently is
#[derive(Debug, Clone)]
pub enum Stage {
    /// A level is active (welcome screen or playing)
    Level(LevelState),
    /// Between levels; counts down on the simulation clock
    Transition { next: LevelId, remaining_ms: f64 },
    /// The run ended in failure; the failed level is kept for display
    GameOver(LevelState),
    /// All three levels cleared
    Victory,
}

/// Run-level notifications for audio and UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LevelStarted(LevelId),
    LevelCompleted(LevelId),
    LevelFailed(LevelId, GameOverCause),
    BonusCollected(LevelId),
    Victory,
    NewGame,
}

pub struct Game {
    /// Run seed; every level derives its own seed from it
    pub seed: u64,
    pub tuning: Tuning,
    stage: Stage,
    /// Runs started so far (the first run is 0)
    run: u32,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let stage = Stage::Level(LevelState::for_level(
            LevelId::TrafficDodge,
            &tuning,
            level_seed(seed, 0, LevelId::TrafficDodge),
        ));
        Self {
            seed,
            tuning,
            stage,
            run: 0,
            events: Vec::new(),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The level on screen, if any (including a failed one)
    pub fn current_level(&self) -> Option<&LevelState> {
        match &self.stage {
            Stage::Level(level) | Stage::GameOver(level) => Some(level),
            Stage::Transition { .. } | Stage::Victory => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.stage, Stage::GameOver(_))
    }

    pub fn is_victory(&self) -> bool {
        matches!(self.stage, Stage::Victory)
    }

    /// Advance the run by one fixed timestep
    pub fn update(&mut self, input: &TickInput, dt: f32) {
        if input.new_game {
            self.new_game();
            return;
        }

        let stage = std::mem::replace(&mut self.stage, Stage::Victory);
        self.stage = match stage {
            Stage::Level(mut level) => {
                tick(&mut level, input, dt);
                self.forward_events(&mut level);
                self.after_level_tick(level)
            }
            Stage::Transition { next, remaining_ms } => {
                let remaining_ms = remaining_ms - f64::from(dt) * 1000.0;
                if remaining_ms <= 0.0 {
                    log::info!("Entering level {} ({})", next.number(), next.name());
                    Stage::Level(self.build_level(next))
                } else {
                    Stage::Transition { next, remaining_ms }
                }
            }
            Stage::GameOver(_) if input.restart || input.start => self.fresh_run(),
            Stage::GameOver(level) => Stage::GameOver(level),
            Stage::Victory => Stage::Victory,
        };
    }

    /// Throw away the current run and go back to Level 1's welcome screen
    pub fn new_game(&mut self) {
        self.stage = self.fresh_run();
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn fresh_run(&mut self) -> Stage {
        self.run = self.run.wrapping_add(1);
        log::info!("New game (run {})", self.run);
        self.events.push(GameEvent::NewGame);
        Stage::Level(self.build_level(LevelId::TrafficDodge))
    }

    fn build_level(&self, id: LevelId) -> LevelState {
        LevelState::for_level(id, &self.tuning, level_seed(self.seed, self.run, id))
    }

    fn forward_events(&mut self, level: &mut LevelState) {
        let id = level.id();
        for event in level.drain_events() {
            let event = match event {
                LevelEvent::Started | LevelEvent::Restarted => GameEvent::LevelStarted(id),
                LevelEvent::Completed => GameEvent::LevelCompleted(id),
                LevelEvent::Failed(cause) => GameEvent::LevelFailed(id, cause),
                LevelEvent::BonusCollected { .. } => GameEvent::BonusCollected(id),
            };
            self.events.push(event);
        }
    }

    fn after_level_tick(&mut self, level: LevelState) -> Stage {
        match level.phase {
            LevelPhase::Welcome | LevelPhase::Playing => Stage::Level(level),
            LevelPhase::GameOver => {
                log::info!("Game over on level {}", level.id().number());
                Stage::GameOver(level)
            }
            LevelPhase::LevelComplete => match level.id().next() {
                Some(next) => {
                    log::info!(
                        "Get ready for level {}: {}",
                        next.number(),
                        next.name()
                    );
                    Stage::Transition {
                        next,
                        remaining_ms: self.tuning.transition_ms,
                    }
                }
                None => {
                    log::info!("All levels cleared");
                    self.events.push(GameEvent::Victory);
                    Stage::Victory
                }
            },
        }
    }
}

/// Per-level seed: varies with the level and the run, stable for a given run seed
fn level_seed(seed: u64, run: u32, level: LevelId) -> u64 {
    (u64::from(level.number()) + (u64::from(run) << 8))
        .wrapping_mul(2654435761)
        .wrapping_add(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::{Obstacle, ObstacleKind};
    use glam::Vec2;

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    fn level_mut(game: &mut Game) -> &mut LevelState {
        match &mut game.stage {
            Stage::Level(level) => level,
            other => panic!("expected a level, got {:?}", other),
        }
    }

    #[test]
    fn test_starts_on_level_one_welcome() {
        let game = Game::new(1);
        let level = game.current_level().unwrap();
        assert_eq!(level.id(), LevelId::TrafficDodge);
        assert_eq!(level.phase, LevelPhase::Welcome);
    }

    #[test]
    fn test_completion_runs_transition_then_next_level() {
        let mut game = Game::new(2);
        game.update(&start(), SIM_DT);
        assert_eq!(game.drain_events(), vec![GameEvent::LevelStarted(LevelId::TrafficDodge)]);

        // Put the player past the finish line; next tick completes
        level_mut(&mut game).player.pos.x = 1000.0;
        game.update(&TickInput::default(), SIM_DT);
        assert!(matches!(
            game.stage(),
            Stage::Transition {
                next: LevelId::MetroRush,
                ..
            }
        ));
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::LevelCompleted(LevelId::TrafficDodge)]
        );

        // The transition ignores input and lasts 2000 ms (120 ticks)
        for _ in 0..119 {
            game.update(&start(), SIM_DT);
            assert!(matches!(game.stage(), Stage::Transition { .. }));
        }
        game.update(&TickInput::default(), SIM_DT);
        let level = game.current_level().unwrap();
        assert_eq!(level.id(), LevelId::MetroRush);
        assert_eq!(level.phase, LevelPhase::Welcome);
        assert_eq!(level.attempt, 0);
    }

    #[test]
    fn test_finale_completion_is_victory() {
        let mut game = Game::new(3);
        game.stage = Stage::Level(game.build_level(LevelId::Finale));
        game.update(&start(), SIM_DT);
        level_mut(&mut game).player.pos.y = 10.0;
        game.update(&TickInput::default(), SIM_DT);

        assert!(game.is_victory());
        let events = game.drain_events();
        assert_eq!(
            events[events.len() - 2..],
            [GameEvent::LevelCompleted(LevelId::Finale), GameEvent::Victory]
        );

        // Victory is terminal until a new game
        game.update(&start(), SIM_DT);
        assert!(game.is_victory());
    }

    #[test]
    fn test_failure_then_restart_goes_back_to_level_one() {
        let mut game = Game::new(4);
        game.stage = Stage::Level(game.build_level(LevelId::MetroRush));
        game.update(&start(), SIM_DT);
        level_mut(&mut game).obstacles.push(Obstacle {
            id: 500,
            kind: ObstacleKind::Crowd,
            lane: None,
            pos: Vec2::new(60.0, 380.0),
            size: Vec2::new(40.0, 40.0),
            speed: 300.0,
        });
        game.update(&TickInput::default(), SIM_DT);

        assert!(game.is_game_over());
        assert!(game.drain_events().contains(&GameEvent::LevelFailed(
            LevelId::MetroRush,
            GameOverCause::Collision(ObstacleKind::Crowd)
        )));
        // The failed level is still visible and frozen
        let frozen = game.current_level().unwrap().player.clone();
        game.update(&TickInput::default(), SIM_DT);
        assert_eq!(game.current_level().unwrap().player, frozen);

        game.update(
            &TickInput {
                restart: true,
                ..Default::default()
            },
            SIM_DT,
        );
        let level = game.current_level().unwrap();
        assert_eq!(level.id(), LevelId::TrafficDodge);
        assert_eq!(level.phase, LevelPhase::Welcome);
        assert_eq!(game.drain_events(), vec![GameEvent::NewGame]);
    }

    #[test]
    fn test_new_game_from_anywhere() {
        let mut game = Game::new(5);
        game.stage = Stage::Transition {
            next: LevelId::Finale,
            remaining_ms: 500.0,
        };
        game.update(
            &TickInput {
                new_game: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(
            game.current_level().map(LevelState::id),
            Some(LevelId::TrafficDodge)
        );
    }

    #[test]
    fn test_level_seeds_differ_per_level_and_run() {
        let a = level_seed(7, 0, LevelId::TrafficDodge);
        let b = level_seed(7, 0, LevelId::MetroRush);
        let c = level_seed(7, 1, LevelId::TrafficDodge);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, level_seed(7, 0, LevelId::TrafficDodge));
    }
}
