//! Shared helpers for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tiercache::{Address, CacheConfig, CacheStore, Coordinates, GeocodeError, Geocoder, ManualClock, MemoryStore};

/// Route library events to the test output when `TIERCACHE_LOG` asks for them
pub fn init_tracing() {
    if let Ok(directives) = std::env::var("TIERCACHE_LOG") {
        let _ = tiercache::logging::init_with_filter(&directives);
    }
}

pub struct TestCache {
    pub cache: CacheStore,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

pub fn test_cache(config: CacheConfig) -> TestCache {
    init_tracing();
    let clock = Arc::new(ManualClock::starting_now());
    let store = Arc::new(MemoryStore::new());
    let cache = CacheStore::builder()
        .config(config)
        .persistent(store.clone())
        .clock(clock.clone())
        .build()
        .expect("failed to build cache");
    TestCache {
        cache,
        clock,
        store,
    }
}

/// Geocoder answering every point with a made-up street
#[derive(Default)]
pub struct CountingGeocoder {
    calls: AtomicUsize,
}

impl CountingGeocoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for CountingGeocoder {
    fn name(&self) -> &str {
        "counting"
    }

    async fn reverse(&self, coordinates: Coordinates) -> Result<Address, GeocodeError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let mut address = Address::fallback(coordinates);
        address.display_name = format!("{n} Test Street");
        address.road = Some("Test Street".to_string());
        Ok(address)
    }
}
