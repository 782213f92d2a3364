//! Metrics and statistics tracking for the rate limiter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Snapshot of limiter activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimiterMetrics {
    /// Units of work that settled, successfully or not
    pub total_processed: u64,
    /// Units of work that failed or panicked
    pub total_errors: u64,
    /// Queued items rejected by `clear()`
    pub total_cleared: u64,
    /// Mean time between enqueue and start
    pub average_wait_time: Duration,
    /// Longest time between enqueue and start
    pub longest_wait_time: Duration,
}

/// Internal counters
#[derive(Debug, Default)]
pub(super) struct MetricsState {
    started: AtomicU64,
    processed: AtomicU64,
    errors: AtomicU64,
    cleared: AtomicU64,
    total_wait_nanos: AtomicU64,
    longest_wait_nanos: AtomicU64,
}

impl MetricsState {
    pub fn record_start(&self, waited: Duration) {
        let nanos = u64::try_from(waited.as_nanos()).unwrap_or(u64::MAX);
        self.started.fetch_add(1, Ordering::Relaxed);
        self.total_wait_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.longest_wait_nanos.fetch_max(nanos, Ordering::Relaxed);
    }

    pub fn record_settled(&self, succeeded: bool) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_cleared(&self, count: usize) {
        self.cleared.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RateLimiterMetrics {
        let started = self.started.load(Ordering::Relaxed);
        let total_wait = self.total_wait_nanos.load(Ordering::Relaxed);
        let average = if started == 0 { 0 } else { total_wait / started };

        RateLimiterMetrics {
            total_processed: self.processed.load(Ordering::Relaxed),
            total_errors: self.errors.load(Ordering::Relaxed),
            total_cleared: self.cleared.load(Ordering::Relaxed),
            average_wait_time: Duration::from_nanos(average),
            longest_wait_time: Duration::from_nanos(self.longest_wait_nanos.load(Ordering::Relaxed)),
        }
    }
}
