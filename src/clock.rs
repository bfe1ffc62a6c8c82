//! Monotonic time for the host loop
//!
//! The simulation only ever sees `dt` in seconds. Turning timestamps into
//! deltas happens here, with the last timestamp held per timer instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic time source
pub trait Clock: Send + Sync {
    /// Time since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock for tests and replays
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Seconds elapsed from `last` to `now` (zero if the clock went backwards)
#[inline]
pub fn delta_seconds(last: Duration, now: Duration) -> f32 {
    now.saturating_sub(last).as_secs_f32()
}

/// Per-frame delta tracker
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last: Option<Duration>,
    max_dt: Option<f32>,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every delta to `max_dt` (prevents a long stall from teleporting the bird)
    pub fn with_max_dt(max_dt: f32) -> Self {
        Self {
            last: None,
            max_dt: Some(max_dt),
        }
    }

    /// Delta since the previous call; the first call returns 0
    pub fn delta_seconds(&mut self, now: Duration) -> f32 {
        let dt = match self.last {
            Some(last) => delta_seconds(last, now),
            None => 0.0,
        };
        self.last = Some(now);
        match self.max_dt {
            Some(max) => dt.min(max),
            None => dt,
        }
    }

    /// Forget the previous timestamp
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_delta_is_zero() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.delta_seconds(Duration::from_secs(5)), 0.0);
        let dt = timer.delta_seconds(Duration::from_millis(5016));
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_delta_clamped() {
        let mut timer = FrameTimer::with_max_dt(0.1);
        timer.delta_seconds(Duration::ZERO);
        assert_eq!(timer.delta_seconds(Duration::from_secs(3)), 0.1);
    }

    #[test]
    fn test_backwards_clock_is_zero() {
        assert_eq!(
            delta_seconds(Duration::from_secs(2), Duration::from_secs(1)),
            0.0
        );
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(250));
        assert_eq!(other.now(), Duration::from_millis(250));
    }

    #[test]
    fn test_reset_restarts_warmup() {
        let mut timer = FrameTimer::new();
        timer.delta_seconds(Duration::ZERO);
        timer.reset();
        assert_eq!(timer.delta_seconds(Duration::from_secs(10)), 0.0);
    }
}
