//! Time sources for log record timestamping.
//!
//! The provider stamps every emitted record with an observed timestamp read
//! from an injectable [`Clock`]. Production code uses [`SystemClock`];
//! tests inject [`ManualClock`] for deterministic timestamps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A timestamp with nanosecond resolution, relative to the UNIX epoch.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Returns the timestamp as nanoseconds since the UNIX epoch.
    pub fn as_nanos(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A source of the current time.
///
/// Injected into the provider at construction so tests can control
/// timestamps; see [`ManualClock`].
pub trait Clock: core::fmt::Debug + Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// A [`Clock`] backed by [`SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            // A system clock set before 1970 yields the epoch itself.
            .unwrap_or(Duration::ZERO);

        Timestamp(since_epoch.as_nanos() as u64)
    }
}

/// A [`Clock`] returning a manually controlled time, for tests.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use lumen_logs::clock::{Clock, ManualClock, Timestamp};
///
/// let clock = ManualClock::new(Timestamp(1_000));
/// assert_eq!(clock.now(), Timestamp(1_000));
///
/// clock.advance(Duration::from_nanos(500));
/// assert_eq!(clock.now(), Timestamp(1_500));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a clock initially reporting the given time.
    pub fn new(now: Timestamp) -> Self {
        Self {
            nanos: AtomicU64::new(now.as_nanos()),
        }
    }

    /// Sets the reported time.
    pub fn set(&self, now: Timestamp) {
        self.nanos.store(now.as_nanos(), Ordering::Relaxed);
    }

    /// Advances the reported time by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.nanos.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic_enough() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second >= first);
    }

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(Timestamp(10));
        clock.set(Timestamp(42));
        assert_eq!(clock.now(), Timestamp(42));

        clock.advance(Duration::from_nanos(8));
        assert_eq!(clock.now(), Timestamp(50));
    }
}
