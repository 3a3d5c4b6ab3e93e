//! Time primitives for posefx
//!
//! Every tick is stamped with a `Timestamp` (milliseconds since the session
//! clock started). State machines never read the wall clock themselves; the
//! caller hands them `now`, which keeps them deterministic under test.

use std::ops::{Add, Sub};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Milliseconds since session start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn millis_since(self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0).max(0)
    }

    /// Add a duration, pinning at the end of time instead of wrapping
    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        Timestamp(self.0.saturating_add(millis))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Timestamp) -> Self::Output {
        Duration::from_millis(self.millis_since(rhs) as u64)
    }
}

impl std::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}ms)", self.0)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of tick timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Monotonic clock anchored at construction
pub struct SystemClock {
    reference: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            reference: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.reference.elapsed().as_millis() as i64)
    }
}

/// Manually advanced clock for tests and replays
#[derive(Default)]
pub struct ManualClock {
    value: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            value: AtomicI64::new(start.0),
        }
    }

    pub fn set(&self, t: Timestamp) {
        self.value.store(t.0, Ordering::SeqCst);
    }

    pub fn advance(&self, dt: Duration) -> Timestamp {
        let dt = dt.as_millis() as i64;
        Timestamp(self.value.fetch_add(dt, Ordering::SeqCst) + dt)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.value.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_arithmetic() {
        let t = Timestamp::from_millis(1000);
        let later = t + Duration::from_millis(250);
        assert_eq!(later.as_millis(), 1250);
        assert_eq!(later - t, Duration::from_millis(250));
        // Going backwards saturates
        assert_eq!(t - later, Duration::ZERO);
        assert_eq!(t.millis_since(later), 0);
    }

    #[test]
    fn test_timestamp_add_saturates() {
        let near_end = Timestamp::from_millis(i64::MAX - 10);
        assert_eq!(near_end + Duration::from_millis(100), Timestamp(i64::MAX));
        assert_eq!(Timestamp::ZERO.saturating_add(Duration::MAX), Timestamp(i64::MAX));
        assert_eq!(Timestamp(i64::MAX).millis_since(Timestamp(i64::MIN)), i64::MAX);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(Timestamp::from_millis(10));
        assert_eq!(clock.now(), Timestamp(10));
        assert_eq!(clock.advance(Duration::from_millis(90)), Timestamp(100));
        clock.set(Timestamp(5));
        assert_eq!(clock.now(), Timestamp(5));
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
