//! Wall-clock abstraction
//!
//! Expiration and recency in the cache are computed against a [`Clock`]
//! rather than calling `Utc::now()` directly, so that long TTLs can be
//! exercised without waiting and so a host can freeze time while suspended.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::time::Duration;

/// Source of the current time
pub trait Clock: Send + Sync + Debug {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Create a clock frozen at the current system time
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now = add_duration(*now, by).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    /// Jump to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_now()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Add a std `Duration` to a timestamp, saturating instead of overflowing
pub fn add_duration(at: DateTime<Utc>, by: Duration) -> Option<DateTime<Utc>> {
    ChronoDuration::from_std(by)
        .ok()
        .and_then(|delta| at.checked_add_signed(delta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_only_moves_when_advanced() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(clock.now(), start + ChronoDuration::days(7));
    }

    #[test]
    fn test_add_duration_overflow_is_none() {
        let now = Utc::now();
        assert!(add_duration(now, Duration::from_secs(u64::MAX)).is_none());
        assert_eq!(
            add_duration(now, Duration::from_secs(60)),
            Some(now + ChronoDuration::seconds(60))
        );
    }
}
