//! Rain showers over the traffic level
//!
//! Purely decorative: drops are drawn from the decor RNG stream and nothing
//! here is visible to spawning, collisions or the win check.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::Decor;
use super::timer::{TimerKind, Timers};
use crate::lerp_range;
use crate::tuning::RainTuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raindrop {
    /// Top end of the streak
    pub pos: Vec2,
    pub length: f32,
    /// Units per second, downward
    pub speed: f32,
    pub opacity: f32,
}

/// Advance the shower by one tick
pub fn update(
    decor: &mut Decor,
    timers: &mut Timers,
    params: &RainTuning,
    playfield: Vec2,
    now_ms: f64,
    dt: f32,
    rng: &mut Pcg32,
) {
    // One shower at a time: a pending stop means one is already running
    if !decor.raining
        && !timers.is_pending(TimerKind::RainStop)
        && rng.random_bool(params.start_chance)
    {
        decor.raining = true;
        let duration = params.min_duration_ms
            + (params.max_duration_ms - params.min_duration_ms) * rng.random::<f64>();
        timers.schedule(TimerKind::RainStop, now_ms + duration);
        log::debug!("Rain for {:.0} ms", duration);
    }

    if !decor.raining {
        decor.rain.clear();
        return;
    }

    for drop in decor.rain.iter_mut() {
        drop.pos.y += drop.speed * dt;
    }
    let floor = playfield.y + params.overscan;
    decor.rain.retain(|drop| drop.pos.y < floor);

    for _ in 0..params.drops_per_tick {
        decor.rain.push(Raindrop {
            pos: Vec2::new(rng.random::<f32>() * playfield.x, 0.0),
            length: lerp_range(params.min_length, params.max_length, rng.random()),
            speed: lerp_range(params.min_speed, params.max_speed, rng.random()),
            opacity: lerp_range(params.min_opacity, params.max_opacity, rng.random()),
        });
    }
}

/// End the shower (fired by the `RainStop` timer)
pub fn stop(decor: &mut Decor) {
    decor.raining = false;
    decor.rain.clear();
}
