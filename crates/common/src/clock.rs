//! Frame loop timing.
//!
//! - [`SessionClock`] marks when a smile session started
//! - [`RateController`] paces ticks at the capture frame rate
//! - [`FrameBudget`] bounds the work done for one frame

use std::time::{Duration, Instant};

/// Start time of a smile session.
#[derive(Debug, Clone)]
pub struct SessionClock {
    started: Instant,

    /// RFC 3339 wall time at start, reported in session summaries.
    started_wall: String,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Nanoseconds since start, the time base for [`RateController`].
    pub fn elapsed_ns(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn epoch_wall(&self) -> &str {
        &self.started_wall
    }
}

/// Frame rate controller for paced frame loops.
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    ///
    /// A rate of zero is treated as 1 Hz.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick is due, zero if it already is.
    pub fn until_next(&self, current_ns: u64) -> Duration {
        match self.last_tick_ns {
            None => Duration::ZERO,
            Some(last) => {
                Duration::from_nanos((last + self.target_interval_ns).saturating_sub(current_ns))
            }
        }
    }
}

/// Per-frame time budget: one frame interval at the capture rate.
#[derive(Debug, Clone, Copy)]
pub struct FrameBudget {
    budget: Duration,
}

impl FrameBudget {
    /// Budget of one frame interval at `fps`.
    pub fn for_fps(fps: u32) -> Self {
        Self {
            budget: Duration::from_nanos(1_000_000_000 / fps.max(1) as u64),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Whether `elapsed` overran the budget.
    pub fn exceeded(&self, elapsed: Duration) -> bool {
        elapsed > self.budget
    }
}

impl Default for FrameBudget {
    fn default() -> Self {
        Self::for_fps(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        assert!(clock.elapsed_ns() < 1_000_000_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_rate_controller() {
        let mut ctrl = RateController::new(60);
        assert!(ctrl.should_tick(0)); // first tick always fires
        assert!(!ctrl.should_tick(1_000_000)); // 1ms later, too soon
        assert!(ctrl.should_tick(17_000_000)); // ~17ms later (60Hz ~ 16.67ms)
    }

    #[test]
    fn test_rate_controller_until_next() {
        let mut ctrl = RateController::new(100);
        assert_eq!(ctrl.until_next(0), Duration::ZERO);
        ctrl.should_tick(0);
        assert_eq!(ctrl.until_next(4_000_000), Duration::from_millis(6));
        assert_eq!(ctrl.until_next(20_000_000), Duration::ZERO);
    }

    #[test]
    fn test_zero_rate_does_not_panic() {
        let mut ctrl = RateController::new(0);
        assert!(ctrl.should_tick(0));
        assert_eq!(ctrl.until_next(0), Duration::from_secs(1));
    }

    #[test]
    fn test_frame_budget() {
        let budget = FrameBudget::for_fps(60);
        assert!(!budget.exceeded(Duration::from_millis(2)));
        assert!(budget.exceeded(Duration::from_millis(20)));
        assert_eq!(FrameBudget::default().budget(), budget.budget());
    }
}
