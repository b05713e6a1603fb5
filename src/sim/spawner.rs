//! Obstacle spawning
//!
//! Decides when a new obstacle appears and where. Spawning is pure: it
//! returns the new obstacle and leaves appending and time-stamping to the
//! caller.

use glam::Vec2;
use rand::Rng;

use super::entity::Obstacle;
use super::level::{LevelConfig, Movement, ObstacleSpec, SpawnRule};
use crate::lerp_range;

/// Placement attempts for falling obstacles before accepting an overlap
const MAX_PLACEMENT_TRIES: usize = 8;

/// Whether the cadence allows a spawn now
pub fn due(rule: &SpawnRule, now_ms: f64, last_spawn_ms: f64, spawned: u32) -> bool {
    if rule.max_spawns.is_some_and(|max| spawned >= max) {
        return false;
    }
    now_ms - last_spawn_ms > rule.interval_ms
}

/// Uniformly pick an entry of the level's obstacle table; `None` if it is empty
pub fn pick_spec<'a, R: Rng + ?Sized>(
    config: &'a LevelConfig,
    rng: &mut R,
) -> Option<&'a ObstacleSpec> {
    pick(&config.obstacles, rng)
}

/// Pick a lane that is neither out of service nor occupied near the spawn edge.
///
/// If every open lane is busy, falls back to any lane other than the
/// blocked one and accepts the overlap.
pub fn pick_lane<R: Rng + ?Sized>(
    lanes: usize,
    existing: &[Obstacle],
    blocked_lane: Option<usize>,
    edge_x: f32,
    rng: &mut R,
) -> usize {
    let open: Vec<usize> = (0..lanes).filter(|&lane| Some(lane) != blocked_lane).collect();
    let free: Vec<usize> = open
        .iter()
        .copied()
        .filter(|&lane| {
            !existing
                .iter()
                .any(|obs| obs.lane == Some(lane) && obs.pos.x > edge_x)
        })
        .collect();

    if let Some(&lane) = pick(&free, rng) {
        return lane;
    }
    log::debug!("No free lane near the spawn edge, accepting overlap");
    match pick(&open, rng) {
        Some(&lane) => lane,
        None => rng.random_range(0..lanes.max(1)),
    }
}

/// Pick an x inside `[min_x, min_x + width - obstacle_width]` that does not
/// overlap an obstacle still near the top edge
pub fn pick_x<R: Rng + ?Sized>(
    min_x: f32,
    width: f32,
    obstacle_size: Vec2,
    spawn_y: f32,
    existing: &[Obstacle],
    rng: &mut R,
) -> f32 {
    let span = (width - obstacle_size.x).max(0.0);
    let near_edge = spawn_y + 2.0 * obstacle_size.y;
    let mut x = min_x;
    for _ in 0..MAX_PLACEMENT_TRIES {
        x = min_x + rng.random::<f32>() * span;
        let clear = !existing.iter().any(|obs| {
            obs.pos.y < near_edge && x < obs.pos.x + obs.size.x && x + obstacle_size.x > obs.pos.x
        });
        if clear {
            return x;
        }
    }
    x
}

/// Create the next obstacle for a level. A level with an empty obstacle
/// table never spawns.
pub fn spawn<R: Rng + ?Sized>(
    config: &LevelConfig,
    existing: &[Obstacle],
    blocked_lane: Option<usize>,
    id: u32,
    rng: &mut R,
) -> Option<Obstacle> {
    let spec = *pick_spec(config, rng)?;
    let speed = lerp_range(spec.min_speed, spec.max_speed, rng.random());
    let size = config.obstacle_size;

    let (lane, pos) = match config.movement {
        Movement::Lanes { count, .. } => {
            let edge_x = config.playfield.x - 2.0 * size.x;
            let lane = pick_lane(count, existing, blocked_lane, edge_x, rng);
            let pos = Vec2::new(config.playfield.x, config.lane_top(lane, size.y));
            (Some(lane), pos)
        }
        Movement::Falling { .. } => {
            let (min_x, width, spawn_y) = match config.fall_band {
                Some(band) => (band.min_x, band.width, band.spawn_y),
                None => (0.0, config.playfield.x, -size.y),
            };
            let x = pick_x(min_x, width, size, spawn_y, existing, rng);
            (None, Vec2::new(x, spawn_y))
        }
    };

    log::debug!(
        "Spawned {} #{} at ({:.0}, {:.0}) speed {:.0}",
        spec.kind.as_str(),
        id,
        pos.x,
        pos.y,
        speed
    );

    Some(Obstacle {
        id,
        kind: spec.kind,
        lane,
        pos,
        size,
        speed,
    })
}

fn pick<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        Some(&items[rng.random_range(0..items.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::ObstacleKind;
    use crate::sim::level::LevelId;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn lane_obstacle(id: u32, lane: usize, x: f32) -> Obstacle {
        Obstacle {
            id,
            kind: ObstacleKind::Cow,
            lane: Some(lane),
            pos: Vec2::new(x, 0.0),
            size: Vec2::new(40.0, 40.0),
            speed: 180.0,
        }
    }

    #[test]
    fn test_due_respects_interval_and_cap() {
        let rule = SpawnRule {
            interval_ms: 700.0,
            max_spawns: None,
        };
        assert!(!due(&rule, 700.0, 0.0, 0));
        assert!(due(&rule, 700.1, 0.0, 0));

        let capped = SpawnRule {
            interval_ms: 2000.0,
            max_spawns: Some(2),
        };
        assert!(due(&capped, 2500.0, 0.0, 1));
        assert!(!due(&capped, 9000.0, 0.0, 2));
    }

    #[test]
    fn test_pick_lane_avoids_busy_lanes() {
        let mut rng = Pcg32::seed_from_u64(3);
        // Lanes 0, 1 and 3 have obstacles right at the edge; lane 4 is blocked
        let existing = vec![
            lane_obstacle(1, 0, 1090.0),
            lane_obstacle(2, 1, 1050.0),
            lane_obstacle(3, 3, 1021.0),
        ];
        for _ in 0..50 {
            assert_eq!(pick_lane(5, &existing, Some(4), 1020.0, &mut rng), 2);
        }
    }

    #[test]
    fn test_pick_lane_ignores_obstacles_past_the_edge() {
        let mut rng = Pcg32::seed_from_u64(4);
        let existing = vec![lane_obstacle(1, 0, 1000.0)];
        let mut seen = [false; 2];
        for _ in 0..100 {
            seen[pick_lane(2, &existing, None, 1020.0, &mut rng)] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn test_pick_lane_fallback_skips_blocked_lane() {
        let mut rng = Pcg32::seed_from_u64(5);
        let existing: Vec<_> = (0..5).map(|lane| lane_obstacle(lane as u32, lane, 1080.0)).collect();
        for _ in 0..100 {
            assert_ne!(pick_lane(5, &existing, Some(1), 1020.0, &mut rng), 1);
        }
    }

    #[test]
    fn test_traffic_spawn_enters_at_right_edge() {
        let config = LevelConfig::for_level(LevelId::TrafficDodge, &Tuning::default());
        let mut rng = Pcg32::seed_from_u64(6);
        let obs = spawn(&config, &[], Some(0), 1, &mut rng).unwrap();

        assert_eq!(obs.pos.x, 1100.0);
        let lane = obs.lane.unwrap();
        assert_ne!(lane, 0);
        assert_eq!(obs.pos.y, lane as f32 * 120.0 + 40.0);
        let expected = match obs.kind {
            ObstacleKind::Zepto => 420.0,
            ObstacleKind::Auto => 240.0,
            ObstacleKind::Cow => 180.0,
            other => panic!("unexpected {:?} in traffic", other),
        };
        assert_eq!(obs.speed, expected);
    }

    #[test]
    fn test_metro_spawn_falls_from_above() {
        let config = LevelConfig::for_level(LevelId::MetroRush, &Tuning::default());
        let mut rng = Pcg32::seed_from_u64(7);
        for id in 0..100 {
            let obs = spawn(&config, &[], None, id, &mut rng).unwrap();
            assert_eq!(obs.lane, None);
            assert_eq!(obs.pos.y, -40.0);
            assert!(obs.pos.x >= 0.0 && obs.pos.x <= 1060.0);
            assert!(obs.speed >= 300.0 && obs.speed <= 480.0);
            assert!(matches!(
                obs.kind,
                ObstacleKind::Crowd
                    | ObstacleKind::TeaStall
                    | ObstacleKind::Watchman
                    | ObstacleKind::Police
            ));
        }
    }

    #[test]
    fn test_finale_spawn_stays_on_the_pitch() {
        let config = LevelConfig::for_level(LevelId::Finale, &Tuning::default());
        let mut rng = Pcg32::seed_from_u64(8);
        for id in 0..100 {
            let obs = spawn(&config, &[], None, id, &mut rng).unwrap();
            assert_eq!(obs.kind, ObstacleKind::Csk);
            assert_eq!(obs.pos.y, 0.0);
            assert!(obs.pos.x >= 467.4 && obs.pos.x + 40.0 <= 632.6);
        }
    }

    #[test]
    fn test_pick_x_avoids_fresh_obstacles() {
        let mut rng = Pcg32::seed_from_u64(9);
        let existing = vec![Obstacle {
            id: 1,
            kind: ObstacleKind::Crowd,
            lane: None,
            pos: Vec2::new(0.0, -40.0),
            size: Vec2::new(40.0, 40.0),
            speed: 300.0,
        }];
        for _ in 0..50 {
            let x = pick_x(0.0, 200.0, Vec2::new(40.0, 40.0), -40.0, &existing, &mut rng);
            assert!(x >= 40.0, "x={} overlaps the fresh obstacle", x);
        }
    }

    #[test]
    fn test_empty_obstacle_table_spawns_nothing() {
        let mut config = LevelConfig::for_level(LevelId::MetroRush, &Tuning::default());
        config.obstacles.clear();
        let mut rng = Pcg32::seed_from_u64(10);
        assert!(pick_spec(&config, &mut rng).is_none());
        assert!(spawn(&config, &[], None, 1, &mut rng).is_none());
    }

    proptest! {
        #[test]
        fn spawn_never_uses_blocked_lane(
            seed in any::<u64>(),
            blocked in 0usize..5,
            busy in proptest::collection::vec((0usize..5, 900.0f32..1100.0), 0..12)
        ) {
            let config = LevelConfig::for_level(LevelId::TrafficDodge, &Tuning::default());
            let mut rng = Pcg32::seed_from_u64(seed);
            let existing: Vec<_> = busy
                .iter()
                .enumerate()
                .map(|(i, &(lane, x))| lane_obstacle(i as u32, lane, x))
                .collect();
            let obs = spawn(&config, &existing, Some(blocked), 99, &mut rng).unwrap();
            prop_assert_ne!(obs.lane, Some(blocked));
        }
    }
}
