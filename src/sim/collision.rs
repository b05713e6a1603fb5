//! Collision detection and response
//!
//! Detection is a plain AABB test (lane levels replace the vertical test with
//! lane equality). Response is resolved over the whole tick at once so the
//! outcome does not depend on the order obstacles are visited in: any blocking
//! contact ends the attempt and suppresses bonuses for that tick.

use super::entity::{Obstacle, ObstacleClass, ObstacleKind, Player};
use super::state::{GameOverCause, LevelEvent, LevelState};

/// Effect of touching one obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEffect {
    Block,
    Boost(f32),
    Nothing,
}

/// One overlapping obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub obstacle_id: u32,
    pub kind: ObstacleKind,
    pub effect: CollisionEffect,
}

/// Combined outcome of every contact in a tick
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No contact changes anything
    Clear,
    /// First blocking contact in spawn order
    Blocked(ObstacleKind),
    /// Bonuses to consume, in spawn order
    Boosted { ids: Vec<u32>, total: f32 },
}

/// Overlap test between the player and one obstacle
pub fn overlaps(player: &Player, obstacle: &Obstacle, lane_based: bool) -> bool {
    let p = player.rect();
    let o = obstacle.rect();
    if lane_based {
        obstacle.lane.is_some() && obstacle.lane == player.lane && p.overlaps_x(&o)
    } else {
        p.overlaps(&o)
    }
}

/// Contacts for every overlapping obstacle, in collection order
pub fn check(
    player: &Player,
    obstacles: &[Obstacle],
    lane_based: bool,
    bonus_boost: f32,
) -> Vec<Contact> {
    obstacles
        .iter()
        .filter(|obs| overlaps(player, obs, lane_based))
        .map(|obs| Contact {
            obstacle_id: obs.id,
            kind: obs.kind,
            effect: match obs.kind.class() {
                ObstacleClass::Blocking => CollisionEffect::Block,
                ObstacleClass::Bonus => CollisionEffect::Boost(bonus_boost),
                ObstacleClass::Neutral => CollisionEffect::Nothing,
            },
        })
        .collect()
}

pub fn resolve(contacts: &[Contact]) -> Resolution {
    if let Some(blocking) = contacts
        .iter()
        .find(|c| c.effect == CollisionEffect::Block)
    {
        return Resolution::Blocked(blocking.kind);
    }

    let mut ids = Vec::new();
    let mut total = 0.0;
    for contact in contacts {
        if let CollisionEffect::Boost(boost) = contact.effect {
            ids.push(contact.obstacle_id);
            total += boost;
        }
    }
    if ids.is_empty() {
        Resolution::Clear
    } else {
        Resolution::Boosted { ids, total }
    }
}

/// Detect and apply this tick's collisions
pub fn apply(state: &mut LevelState) {
    let contacts = check(
        &state.player,
        &state.obstacles,
        state.config.movement.is_lane_based(),
        state.config.bonus_boost,
    );
    if contacts.is_empty() {
        return;
    }

    match resolve(&contacts) {
        Resolution::Clear => {}
        Resolution::Blocked(kind) => {
            log::debug!("Hit {} at x={:.0}", kind.as_str(), state.player.pos.x);
            state.fail(GameOverCause::Collision(kind));
        }
        Resolution::Boosted { ids, total } => {
            state.player.pos.x += total;
            state.obstacles.retain(|obs| !ids.contains(&obs.id));
            for &obstacle_id in &ids {
                log::debug!("Bonus #{} consumed", obstacle_id);
                state.push_event(LevelEvent::BonusCollected {
                    obstacle_id,
                    boost: state.config.bonus_boost,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelId;
    use crate::sim::state::LevelPhase;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn obstacle(id: u32, kind: ObstacleKind, lane: Option<usize>, x: f32, y: f32) -> Obstacle {
        Obstacle {
            id,
            kind,
            lane,
            pos: Vec2::new(x, y),
            size: Vec2::new(40.0, 40.0),
            speed: 100.0,
        }
    }

    fn playing(id: LevelId) -> LevelState {
        let mut state = LevelState::for_level(id, &Tuning::default(), 42);
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_lane_overlap_requires_same_lane() {
        let player = Player {
            pos: Vec2::new(30.0, 250.0),
            size: Vec2::new(120.0, 100.0),
            lane: Some(2),
        };
        assert!(overlaps(
            &player,
            &obstacle(1, ObstacleKind::Cow, Some(2), 100.0, 0.0),
            true
        ));
        assert!(!overlaps(
            &player,
            &obstacle(2, ObstacleKind::Cow, Some(3), 100.0, 280.0),
            true
        ));
        // Touching edges do not count
        assert!(!overlaps(
            &player,
            &obstacle(3, ObstacleKind::Cow, Some(2), 150.0, 280.0),
            true
        ));
    }

    #[test]
    fn test_full_aabb_on_falling_levels() {
        let player = Player {
            pos: Vec2::new(30.0, 370.0),
            size: Vec2::new(120.0, 100.0),
            lane: None,
        };
        assert!(overlaps(
            &player,
            &obstacle(1, ObstacleKind::Crowd, None, 50.0, 340.0),
            false
        ));
        assert!(!overlaps(
            &player,
            &obstacle(2, ObstacleKind::Crowd, None, 50.0, 330.0),
            false
        ));
    }

    #[test]
    fn test_blocking_beats_bonus() {
        let contacts = vec![
            Contact {
                obstacle_id: 1,
                kind: ObstacleKind::TeaStall,
                effect: CollisionEffect::Boost(60.0),
            },
            Contact {
                obstacle_id: 2,
                kind: ObstacleKind::Police,
                effect: CollisionEffect::Block,
            },
        ];
        assert_eq!(resolve(&contacts), Resolution::Blocked(ObstacleKind::Police));

        let mut state = playing(LevelId::MetroRush);
        let x = state.player.pos.x;
        state.obstacles = vec![
            obstacle(1, ObstacleKind::TeaStall, None, 60.0, 380.0),
            obstacle(2, ObstacleKind::Police, None, 80.0, 380.0),
        ];
        apply(&mut state);
        assert_eq!(state.phase, LevelPhase::GameOver);
        assert_eq!(state.player.pos.x, x);
        assert_eq!(state.obstacles.len(), 2);
        assert!(
            !state
                .events()
                .iter()
                .any(|e| matches!(e, LevelEvent::BonusCollected { .. }))
        );
    }

    #[test]
    fn test_bonus_consumed_once() {
        let mut state = playing(LevelId::MetroRush);
        state.obstacles = vec![obstacle(7, ObstacleKind::TeaStall, None, 60.0, 380.0)];

        apply(&mut state);
        assert_eq!(state.player.pos.x, 90.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, LevelPhase::Playing);

        apply(&mut state);
        assert_eq!(state.player.pos.x, 90.0);
        assert_eq!(
            state.drain_events(),
            vec![LevelEvent::BonusCollected {
                obstacle_id: 7,
                boost: 60.0
            }]
        );
    }

    #[test]
    fn test_neutral_contact_is_ignored() {
        let mut state = playing(LevelId::MetroRush);
        state.obstacles = vec![obstacle(3, ObstacleKind::Watchman, None, 60.0, 380.0)];
        apply(&mut state);
        assert_eq!(state.phase, LevelPhase::Playing);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.player.pos.x, 30.0);
    }

    proptest! {
        #[test]
        fn blocking_outcome_ignores_order(
            kinds in proptest::collection::vec(
                prop_oneof![
                    Just(ObstacleKind::Crowd),
                    Just(ObstacleKind::Police),
                    Just(ObstacleKind::TeaStall),
                    Just(ObstacleKind::Watchman),
                ],
                1..6,
            ),
            rotate in 0usize..6,
        ) {
            let mut state = playing(LevelId::MetroRush);
            let mut obstacles: Vec<_> = kinds
                .iter()
                .enumerate()
                .map(|(i, &kind)| obstacle(i as u32 + 1, kind, None, 60.0, 380.0))
                .collect();
            let len = obstacles.len();
            obstacles.rotate_left(rotate % len);
            state.obstacles = obstacles;

            apply(&mut state);
            let any_blocking = kinds.iter().any(|k| k.is_blocking());
            prop_assert_eq!(state.phase == LevelPhase::GameOver, any_blocking);
            if any_blocking {
                prop_assert_eq!(state.player.pos.x, 30.0);
            }
        }
    }
}
