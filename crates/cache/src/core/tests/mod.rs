//! Cache behaviour tests
//!
//! Time is driven by a `ManualClock` so expiry and recency are exact.

mod tiers;

use crate::config::CacheConfig;
use crate::storage::MemoryStore;
use crate::CacheStore;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tiercache_core::ManualClock;

pub(super) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub(super) struct Fixture {
    pub cache: CacheStore,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

impl Fixture {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: CacheConfig, store: Arc<MemoryStore>) -> Self {
        let clock = Arc::new(ManualClock::new(epoch()));
        let cache = CacheStore::builder()
            .config(config)
            .persistent(store.clone())
            .clock(clock.clone())
            .build()
            .unwrap();
        Self { cache, clock, store }
    }

    /// A second cache over the same store, as after a restart
    pub fn reopen(&self, config: CacheConfig) -> CacheStore {
        CacheStore::builder()
            .config(config)
            .persistent(self.store.clone())
            .clock(self.clock.clone())
            .build()
            .unwrap()
    }

    pub fn record(&self, combined: &str) -> Option<String> {
        use crate::storage::PersistentStore;
        self.store.get(&format!("tiercache:{combined}")).unwrap()
    }
}
