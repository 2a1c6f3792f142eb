//! Fixed timestep accumulator
//!
//! Converts measured frame deltas into whole simulation ticks so physics is
//! identical regardless of frame rate.

use crate::consts::MAX_FRAME_DT;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.sim_dt, settings.max_substeps)
    }

    /// Simulation timestep in seconds
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Feed one frame's elapsed time; returns how many ticks to run now
    ///
    /// Frame deltas are clamped to `MAX_FRAME_DT` and at most `max_substeps`
    /// ticks run per frame; time beyond that is dropped.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt > 0.0 { frame_dt.min(MAX_FRAME_DT) } else { 0.0 };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        if substeps == self.max_substeps && self.accumulator >= self.dt {
            log::debug!(
                "Dropping {:.3}s of simulation time after {} substeps",
                self.accumulator,
                substeps
            );
            self.accumulator %= self.dt;
        }

        substeps
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStep::new(0.01, 8);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 0);
        assert_eq!(clock.advance(0.004), 1);
        assert!(clock.alpha() > 0.1 && clock.alpha() < 0.3);
    }

    #[test]
    fn test_caps_substeps() {
        let mut clock = FixedStep::new(1.0 / 120.0, 4);
        // 0.1s would be 12 ticks; only 4 run and the backlog is dropped
        assert_eq!(clock.advance(0.5), 4);
        assert!(clock.alpha() < 1.0);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_ignores_bad_deltas() {
        let mut clock = FixedStep::new(0.01, 8);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_steady_frames_average_out() {
        let mut clock = FixedStep::new(1.0 / 60.0, 8);
        let ticks: u32 = (0..600).map(|_| clock.advance(1.0 / 144.0)).sum();
        // 600 frames at 144 Hz is ~4.17s, i.e. 250 ticks at 60 Hz
        assert!((249..=251).contains(&ticks), "ran {ticks} ticks");
    }
}
