//! Fixed timestep simulation tick
//!
//! One step function drives all three levels; the level's `LevelConfig`
//! supplies movement, obstacle table, cadence and goal.

use serde::{Deserialize, Serialize};

use super::autopilot;
use super::collision;
use super::level::Movement;
use super::spawner;
use super::state::{GameOverCause, LevelState};
use super::timer::TimerKind;
use super::weather;

/// A discrete directional command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Lane change (Up/Down) or horizontal step (Left/Right)
    pub direction: Option<Direction>,
    /// Leave the welcome screen
    pub start: bool,
    /// Retry after a game over
    pub restart: bool,
    /// Abandon the run and go back to Level 1 (handled by the orchestrator)
    pub new_game: bool,
    /// Idle/demo mode - autopilot steers the player
    pub idle_mode: bool,
}

/// Advance a level by one fixed timestep
pub fn tick(state: &mut LevelState, input: &TickInput, dt: f32) {
    if input.start {
        state.start();
    }
    if input.restart {
        state.restart();
    }
    if !state.is_playing() {
        return;
    }

    state.time_ticks += 1;
    state.elapsed_ms += f64::from(dt) * 1000.0;

    // Win check comes first: a goal reached last tick stands even if
    // something would hit the player or a timer would fire this tick
    if state.config.goal.reached(&state.player) {
        state.complete();
        return;
    }

    for kind in state.timers.take_due(state.elapsed_ms) {
        match kind {
            TimerKind::TrainDeparture => {
                state.fail(GameOverCause::TrainDeparted);
                return;
            }
            TimerKind::RainStop => weather::stop(&mut state.decor),
        }
    }

    let direction = if input.idle_mode {
        autopilot::steer(state)
    } else {
        input.direction
    };
    if let Some(direction) = direction {
        apply_direction(state, direction);
    }

    advance_player(state, dt);
    advance_obstacles(state, dt);

    if spawner::due(
        &state.config.spawn,
        state.elapsed_ms,
        state.last_spawn_ms,
        state.spawn_count,
    ) {
        let id = state.next_entity_id();
        if let Some(obstacle) = spawner::spawn(
            &state.config,
            &state.obstacles,
            state.blocked_lane,
            id,
            &mut state.rng,
        ) {
            state.obstacles.push(obstacle);
            state.spawn_count += 1;
        }
        state.last_spawn_ms = state.elapsed_ms;
    }

    collision::apply(state);
    if !state.is_playing() {
        return;
    }

    update_decor(state, dt);
}

/// Pure form of [`tick`]: returns the next state and leaves `state` untouched
pub fn step(state: &LevelState, input: &TickInput, dt: f32) -> LevelState {
    let mut next = state.clone();
    tick(&mut next, input, dt);
    next
}

/// Apply a directional command; moves into a blocked lane or off the
/// playfield are dropped silently
fn apply_direction(state: &mut LevelState, direction: Direction) {
    state.decor.instructions_visible = false;
    match state.config.movement {
        Movement::Lanes { .. } => {
            let Some(lane) = state.player.lane else {
                return;
            };
            let target = match direction {
                Direction::Up if lane > 0 => lane - 1,
                Direction::Down => lane + 1,
                _ => return,
            };
            if state.can_enter_lane(target) {
                state.player.lane = Some(target);
                state.player.pos.y = state.config.lane_top(target, state.player.size.y);
            }
        }
        Movement::Falling { step, .. } => {
            let dx = match direction {
                Direction::Left => -step,
                Direction::Right => step,
                Direction::Up | Direction::Down => return,
            };
            let max_x = (state.config.playfield.x - state.player.size.x).max(0.0);
            state.player.pos.x = (state.player.pos.x + dx).clamp(0.0, max_x);
        }
    }
}

fn advance_player(state: &mut LevelState, dt: f32) {
    match state.config.movement {
        Movement::Lanes { forward_speed, .. } => {
            state.player.pos.x += forward_speed * dt;
        }
        Movement::Falling { climb_speed, .. } => {
            if climb_speed > 0.0 {
                state.player.pos.y = (state.player.pos.y - climb_speed * dt).max(0.0);
            }
        }
    }
}

fn advance_obstacles(state: &mut LevelState, dt: f32) {
    let lane_based = state.config.movement.is_lane_based();
    for obstacle in state.obstacles.iter_mut() {
        if lane_based {
            obstacle.pos.x -= obstacle.speed * dt;
        } else {
            obstacle.pos.y += obstacle.speed * dt;
        }
    }
    let config = &state.config;
    state
        .obstacles
        .retain(|obs| !config.is_off_playfield(obs.pos.x, obs.pos.y));
}

fn update_decor(state: &mut LevelState, dt: f32) {
    if let Some(rain) = state.config.rain.as_ref() {
        weather::update(
            &mut state.decor,
            &mut state.timers,
            rain,
            state.config.playfield,
            state.elapsed_ms,
            dt,
            &mut state.decor_rng,
        );
    }

    if let Some(train) = state.config.train {
        let blink_on = train.door_blink_ms > 0.0
            && (state.elapsed_ms / train.door_blink_ms) as u64 % 2 == 1;
        state.decor.door_lit = state.progress() > 0.8 && blink_on;
    }
}
