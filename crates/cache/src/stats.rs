//! Cache statistics

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of cache activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, 0.0 before the first lookup
    pub hit_rate: f64,
    pub memory_entry_count: usize,
    pub persistent_entry_count: usize,
    pub estimated_byte_size: u64,
    pub writes: u64,
    pub removals: u64,
    pub evictions: u64,
    pub expired_cleanups: u64,
    /// Failures that were logged and swallowed or surfaced by `try_*`
    pub errors: u64,
    pub stats_since: DateTime<Utc>,
}

/// Internal cache statistics with atomic counters
pub(crate) struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    removals: AtomicU64,
    evictions: AtomicU64,
    expired_cleanups: AtomicU64,
    errors: AtomicU64,
    stats_since: Mutex<DateTime<Utc>>,
}

/// Sizes of the tiers, gathered under the state lock
pub(crate) struct TierSizes {
    pub memory_entries: usize,
    pub persistent_entries: usize,
    pub bytes: u64,
}

impl CacheStats {
    pub fn new(since: DateTime<Utc>) -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            removals: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expired_cleanups: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            stats_since: Mutex::new(since),
        }
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self, count: u64) {
        self.expired_cleanups.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self, since: DateTime<Utc>) {
        for counter in [
            &self.hits,
            &self.misses,
            &self.writes,
            &self.removals,
            &self.evictions,
            &self.expired_cleanups,
            &self.errors,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        *self.stats_since.lock() = since;
    }

    pub fn snapshot(&self, sizes: TierSizes) -> CacheStatistics {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        CacheStatistics {
            hits,
            misses,
            hit_rate,
            memory_entry_count: sizes.memory_entries,
            persistent_entry_count: sizes.persistent_entries,
            estimated_byte_size: sizes.bytes,
            writes: self.writes.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired_cleanups: self.expired_cleanups.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            stats_since: *self.stats_since.lock(),
        }
    }
}
