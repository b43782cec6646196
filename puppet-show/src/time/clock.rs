//! Session clocks
//!
//! `SessionClock` measures milliseconds from a process-wide origin fixed on
//! first use, the same reference frame a detection model stamps its poses
//! with. `ManualClock` is stepped by hand and drives offline replays and tests.

use std::cell::Cell;
use std::sync::OnceLock;
use std::time::Instant;

/// Process-wide origin, initialized once
static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Source of "now" in milliseconds
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from the process origin
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionClock;

impl SessionClock {
    /// Pin the origin. Later calls are no-ops.
    pub fn init() {
        ORIGIN.get_or_init(Instant::now);
    }

    /// Milliseconds elapsed since the origin.
    #[inline]
    pub fn elapsed_ms() -> f64 {
        ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1_000.0
    }
}

impl Clock for SessionClock {
    #[inline]
    fn now_ms(&self) -> f64 {
        Self::elapsed_ms()
    }
}

/// Hand-stepped clock
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    /// Move forward by `delta_ms` and return the new time.
    pub fn advance(&self, delta_ms: f64) -> f64 {
        let next = self.now.get() + delta_ms;
        self.now.set(next);
        next
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_clock_monotonic() {
        SessionClock::init();
        let t1 = SessionClock.now_ms();
        let t2 = SessionClock.now_ms();
        assert!(t2 >= t1);
        assert!(t1 >= 0.0);
    }

    #[test]
    fn test_session_clock_advances() {
        SessionClock::init();
        let t1 = SessionClock::elapsed_ms();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let t2 = SessionClock::elapsed_ms();
        assert!(t2 - t1 >= 4.0, "expected ~5ms, got {}", t2 - t1);
    }

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::new(100.0);
        assert_eq!(clock.now_ms(), 100.0);

        assert_eq!(clock.advance(16.0), 116.0);
        assert_eq!(clock.now_ms(), 116.0);

        clock.set(0.0);
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn test_clock_trait_object() {
        let clocks: Vec<Box<dyn Clock>> = vec![Box::new(SessionClock), Box::new(ManualClock::new(5.0))];
        assert!(clocks[0].now_ms() >= 0.0);
        assert_eq!(clocks[1].now_ms(), 5.0);
    }
}
