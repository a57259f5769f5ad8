//! Discrete timeline clock
//!
//! Time only moves when the timeline ticks. Tick times are computed from an
//! anchor and a frame index rather than accumulated, so long runs do not
//! drift.

use kine_core::error::ensure_positive;
use kine_core::ConfigResult;

/// Frame-driven clock owned by a timeline
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    frame_rate: f64,
    now: f64,
    tick: u64,
}

impl Clock {
    pub fn new(frame_rate: f64) -> ConfigResult<Self> {
        Ok(Self {
            frame_rate: ensure_positive("frame_rate", frame_rate)?,
            now: 0.0,
            tick: 0,
        })
    }

    /// Current time in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of ticks taken so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Seconds per tick
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Time of the `frame`-th tick after `anchor`
    pub fn time_after(&self, anchor: f64, frame: u64) -> f64 {
        anchor + frame as f64 / self.frame_rate
    }

    /// Number of ticks needed to cover `duration` seconds (at least one)
    pub fn ticks_for(&self, duration: f64) -> u64 {
        if !duration.is_finite() || duration <= 0.0 {
            return 1;
        }
        // Absorb representation error such as 1.2 * 15 = 17.999...
        ((duration * self.frame_rate) - 1e-9).ceil().max(1.0) as u64
    }

    /// Move to `now` and count one tick. Time never runs backwards.
    pub(crate) fn step_to(&mut self, now: f64) {
        self.now = now.max(self.now);
        self.tick += 1;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            now: 0.0,
            tick: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_creation() {
        let clock = Clock::new(15.0).unwrap();
        assert_eq!(clock.now(), 0.0);
        assert_eq!(clock.tick(), 0);
        assert!(Clock::new(0.0).is_err());
        assert!(Clock::new(-30.0).is_err());
    }

    #[test]
    fn test_ticks_for_duration() {
        let clock = Clock::new(15.0).unwrap();
        assert_eq!(clock.ticks_for(1.5), 23);
        assert_eq!(clock.ticks_for(1.2), 18);
        assert_eq!(clock.ticks_for(4.5), 68);
        assert_eq!(clock.ticks_for(0.0), 1);
        assert_eq!(clock.ticks_for(-1.0), 1);
    }

    #[test]
    fn test_time_after_is_exact_for_whole_frames() {
        let clock = Clock::new(10.0).unwrap();
        assert_eq!(clock.time_after(0.0, 20), 2.0);
        assert_eq!(clock.time_after(1.0, 5), 1.5);
    }

    #[test]
    fn test_step_never_rewinds() {
        let mut clock = Clock::new(10.0).unwrap();
        clock.step_to(1.0);
        clock.step_to(0.5);
        assert_eq!(clock.now(), 1.0);
        assert_eq!(clock.tick(), 2);
    }
}
