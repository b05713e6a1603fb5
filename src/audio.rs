//! Audio cues
//!
//! Procedurally generated sound effects via the Web Audio API; no asset
//! files needed. The event-to-cue mapping is platform independent, the
//! synthesizer only exists on wasm.

use crate::game::GameEvent;
use crate::sim::GameOverCause;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Attempt begins
    Start,
    /// Tea stall boost
    Boost,
    /// Ran into a blocking obstacle
    Crash,
    /// The metro left without the player
    TrainDeparted,
    /// Level cleared
    LevelComplete,
    /// Trophy lifted after the last level
    Victory,
}

impl SoundEffect {
    /// Cue for a run event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LevelStarted(_) => Some(SoundEffect::Start),
            GameEvent::BonusCollected(_) => Some(SoundEffect::Boost),
            GameEvent::LevelFailed(_, GameOverCause::Collision(_)) => Some(SoundEffect::Crash),
            GameEvent::LevelFailed(_, GameOverCause::TrainDeparted) => {
                Some(SoundEffect::TrainDeparted)
            }
            GameEvent::LevelCompleted(_) => Some(SoundEffect::LevelComplete),
            GameEvent::Victory => Some(SoundEffect::Victory),
            GameEvent::NewGame => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::SoundEffect;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.8 }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Volume already combined from the settings (0.0 - 1.0)
        pub fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }

        pub fn play(&self, effect: SoundEffect) {
            let vol = self.volume;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Start => self.play_start(ctx, vol),
                SoundEffect::Boost => self.play_boost(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::TrainDeparted => self.play_train_departed(ctx, vol),
                SoundEffect::LevelComplete => {
                    self.play_arpeggio(ctx, vol, &[400.0, 500.0, 600.0, 800.0], 0.1, 0.4)
                }
                SoundEffect::Victory => self.play_arpeggio(
                    ctx,
                    vol,
                    &[523.0, 659.0, 784.0, 1047.0, 784.0, 1047.0],
                    0.12,
                    0.5,
                ),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Start - short rising whoosh
        fn play_start(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.15)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        /// Boost - bright three-note chirp
        fn play_boost(&self, ctx: &AudioContext, vol: f32) {
            self.play_arpeggio(ctx, vol, &[600.0, 800.0, 1000.0], 0.08, 0.15);
        }

        /// Crash - low square thud
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        /// Train departed - two-tone chime, falling
        fn play_train_departed(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [659.0, 523.0, 392.0].iter().enumerate() {
                let delay = i as f64 * 0.25;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }

        fn play_arpeggio(&self, ctx: &AudioContext, vol: f32, notes: &[f32], gap: f64, len: f64) {
            for (i, freq) in notes.iter().enumerate() {
                let delay = i as f64 * gap;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + len)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + len + 0.1).ok();
                }
            }
        }
    }
}
