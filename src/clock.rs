//! Time base for line attribution
//!
//! All timestamps are microseconds. The wall clock reads the system time of
//! day; the manual clock is set explicitly and is what trace replay and the
//! tests drive.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for the attribution engine
pub trait Clock {
    /// Current time in microseconds
    fn now_us(&self) -> u64;
}

/// Wall-clock time of day in microseconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now_us(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
            .unwrap_or_default()
    }
}

/// Manually advanced clock
///
/// Clones share the same underlying time, so a caller can keep one handle
/// while the session owns another.
///
/// # Example
/// ```
/// use lineprof::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.set(250);
/// assert_eq!(clock.now_us(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time
    pub fn set(&self, at_us: u64) {
        self.now.set(at_us);
    }

    /// Move forward by `delta_us`
    pub fn advance(&self, delta_us: u64) {
        self.now.set(self.now.get().saturating_add(delta_us));
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wall_clock_is_monotonic_enough() {
        let clock = WallClock;
        let t1 = clock.now_us();
        thread::sleep(Duration::from_millis(2));
        let t2 = clock.now_us();
        assert!(t2 >= t1 + 1_000, "expected at least 1ms between reads");
    }

    #[test]
    fn test_manual_clock_starts_at_zero() {
        assert_eq!(ManualClock::new().now_us(), 0);
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.set(100);
        assert_eq!(clock.now_us(), 100);
        handle.advance(50);
        assert_eq!(clock.now_us(), 150);
    }

    #[test]
    fn test_manual_clock_advance_saturates() {
        let clock = ManualClock::new();
        clock.set(u64::MAX - 1);
        clock.advance(10);
        assert_eq!(clock.now_us(), u64::MAX);
    }

    #[test]
    fn test_clock_by_reference() {
        fn read<C: Clock>(clock: C) -> u64 {
            clock.now_us()
        }

        let clock = ManualClock::new();
        clock.set(7);
        assert_eq!(read(&clock), 7);
    }
}
