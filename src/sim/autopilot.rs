//! Idle-mode autopilot
//!
//! A small heuristic that produces the same directional commands a player
//! would. Used by the demo mode and the headless runner.

use glam::Vec2;

use super::entity::Rect;
use super::level::{Goal, Movement};
use super::state::LevelState;
use super::tick::Direction;

/// How far ahead (in units) a lane is checked for oncoming traffic
const LANE_LOOKAHEAD: f32 = 90.0;
/// How far above the player falling obstacles are considered
const FALL_LOOKAHEAD: f32 = 160.0;
/// Horizontal clearance kept from falling obstacles
const SIDE_MARGIN: f32 = 6.0;

/// Pick this tick's direction, or none to hold still
pub fn steer(state: &LevelState) -> Option<Direction> {
    match state.config.movement {
        Movement::Lanes { count, .. } => steer_lanes(state, count),
        Movement::Falling { step, .. } => steer_falling(state, step),
    }
}

fn steer_lanes(state: &LevelState, count: usize) -> Option<Direction> {
    let lane = state.player.lane?;
    let rect = state.player.rect();
    let lane_clear = |lane: usize| {
        !state.obstacles.iter().any(|obs| {
            obs.lane == Some(lane)
                && obs.kind.is_blocking()
                && obs.rect().left() < rect.right() + LANE_LOOKAHEAD
                && obs.rect().right() > rect.left() - 1.0
        })
    };

    if lane_clear(lane) {
        return None;
    }

    let up = lane.checked_sub(1);
    let down = (lane + 1 < count).then_some(lane + 1);
    [(up, Direction::Up), (down, Direction::Down)]
        .into_iter()
        .find_map(|(target, direction)| {
            target
                .filter(|&t| state.can_enter_lane(t) && lane_clear(t))
                .map(|_| direction)
        })
}

fn steer_falling(state: &LevelState, step: f32) -> Option<Direction> {
    let player = state.player.rect();
    let max_x = (state.config.playfield.x - player.size.x).max(0.0);

    let safe_at = |x: f32| {
        let probe = Rect::new(
            Vec2::new(x - SIDE_MARGIN, player.top() - FALL_LOOKAHEAD),
            Vec2::new(
                player.size.x + 2.0 * SIDE_MARGIN,
                player.size.y + FALL_LOOKAHEAD,
            ),
        );
        !state
            .obstacles
            .iter()
            .any(|obs| obs.kind.is_blocking() && probe.overlaps(&obs.rect()))
    };

    // Horizontal levels advance by stepping right; climbing levels hold still
    let preference = match state.config.goal {
        Goal::RightEdgeAt(_) => [Some(Direction::Right), None, Some(Direction::Left)],
        Goal::TopEdgeAt(_) => [None, Some(Direction::Left), Some(Direction::Right)],
    };

    let target_x = |direction: Option<Direction>| match direction {
        Some(Direction::Left) => (player.left() - step).max(0.0),
        Some(Direction::Right) => (player.left() + step).min(max_x),
        _ => player.left(),
    };

    preference
        .into_iter()
        .find(|&direction| safe_at(target_x(direction)))
        .unwrap_or(preference[0])
}
