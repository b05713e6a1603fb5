//! Fixed timestep driver
//!
//! Turns variable frame deltas into a whole number of simulation steps.
//! Leftover time carries into the next frame.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
    max_frame_dt: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS, MAX_FRAME_DT)
    }
}

impl FixedTimestep {
    pub fn new(step: f32, max_substeps: u32, max_frame_dt: f32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
            max_frame_dt,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add a frame's delta (seconds) and return how many steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, self.max_frame_dt);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        // Drop what could not be caught up rather than spiral
        if substeps == self.max_substeps && self.accumulator >= self.step {
            log::debug!("Dropping {:.1} ms of backlog", self.accumulator * 1000.0);
            self.accumulator = 0.0;
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_frames_run_one_step() {
        let mut clock = FixedTimestep::new(0.01, 8, 0.1);
        // 10 frames of 10 ms each, allowing for float drift
        let total: u32 = (0..10).map(|_| clock.advance(0.010_001)).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut clock = FixedTimestep::new(0.01, 8, 0.1);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!((clock.accumulator - 0.002).abs() < 1e-4);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = FixedTimestep::new(0.01, 4, 0.1);
        // A 2 s stall (tab in background) is clamped, capped, and the rest dropped
        assert_eq!(clock.advance(2.0), 4);
        assert_eq!(clock.accumulator, 0.0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = FixedTimestep::default();
        assert_eq!(clock.advance(-1.0), 0);
        clock.advance(0.005);
        clock.reset();
        assert_eq!(clock.accumulator, 0.0);
    }
}
