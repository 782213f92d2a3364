//! Cache construction

use crate::codec::EncryptionCodec;
use crate::config::CacheConfig;
use crate::errors::Result;
use crate::eviction::create_eviction_policy;
use crate::serialization::{decode_index, IndexEntry};
use crate::stats::CacheStats;
use crate::storage::PersistentStore;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tiercache_core::{Clock, SystemClock};

use super::internal::TierState;
use super::types::{CacheStore, StoreInner};

/// Builder for [`CacheStore`]
#[derive(Default)]
pub struct CacheStoreBuilder {
    config: CacheConfig,
    persistent: Option<Arc<dyn PersistentStore>>,
    codec: Option<Arc<dyn EncryptionCodec>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CacheStore {
    pub fn builder() -> CacheStoreBuilder {
        CacheStoreBuilder::default()
    }

    /// Memory-only cache with the given configuration
    pub fn in_memory(config: CacheConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }
}

impl CacheStoreBuilder {
    pub fn config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    /// Back the cache with a persistent tier
    pub fn persistent(mut self, store: Arc<dyn PersistentStore>) -> Self {
        self.persistent = Some(store);
        self
    }

    pub fn codec(mut self, codec: Arc<dyn EncryptionCodec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Source of "now" for TTL and recency; defaults to the system clock
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and load the persistent tier's index
    ///
    /// An unreadable index leaves the persistent tier empty rather than
    /// failing the build.
    pub fn build(self) -> Result<CacheStore> {
        match self.config.validate() {
            Ok(()) => {}
            Err(e) => return Err(e),
        }

        let eviction_policy = match create_eviction_policy(&self.config.eviction_policy) {
            Ok(policy) => policy,
            Err(e) => return Err(e),
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let persisted = match &self.persistent {
            Some(store) => load_index(store.as_ref(), &self.config),
            None => BTreeMap::new(),
        };

        tracing::debug!(
            max_entries = self.config.max_entries,
            eviction_policy = eviction_policy.name(),
            persisted_entries = persisted.len(),
            "Built cache store"
        );

        let now = clock.now();
        Ok(CacheStore {
            inner: Arc::new(StoreInner {
                config: self.config,
                persistent: self.persistent,
                codec: self.codec,
                clock,
                eviction_policy,
                state: Mutex::new(TierState::with_persisted(persisted)),
                stats: CacheStats::new(now),
                sweep_handle: Mutex::new(None),
            }),
        })
    }
}

fn load_index(store: &dyn PersistentStore, config: &CacheConfig) -> BTreeMap<String, IndexEntry> {
    let raw = match store.get(&config.index_key()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read persistent index, starting with an empty persistent tier");
            return BTreeMap::new();
        }
    };

    match decode_index(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Persistent index is unreadable, starting with an empty persistent tier");
            BTreeMap::new()
        }
    }
}
