//! Core cache types and structures

use crate::codec::EncryptionCodec;
use crate::config::CacheConfig;
use crate::eviction::EvictionPolicy;
use crate::stats::CacheStats;
use crate::storage::PersistentStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tiercache_core::Clock;
use tokio::task::JoinHandle;

use super::internal::TierState;

/// Two-tier expiring key/value cache
///
/// The memory tier answers most reads; the optional persistent tier survives
/// restarts and is written through on every `set`. Cloning is cheap and
/// clones share the same state.
#[derive(Clone)]
pub struct CacheStore {
    pub(super) inner: Arc<StoreInner>,
}

pub(super) struct StoreInner {
    /// Configuration
    pub config: CacheConfig,
    /// Persistent tier, absent for memory-only caches
    pub persistent: Option<Arc<dyn PersistentStore>>,
    /// Codec for entries written with `encrypt`
    pub codec: Option<Arc<dyn EncryptionCodec>>,
    pub clock: Arc<dyn Clock>,
    /// Eviction policy
    pub eviction_policy: Box<dyn EvictionPolicy>,
    /// Both tiers
    pub state: Mutex<TierState>,
    /// Statistics
    pub stats: CacheStats,
    /// Background expiry sweep handle
    pub sweep_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        if let Some(handle) = self.sweep_handle.lock().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("CacheStore")
            .field("max_entries", &self.inner.config.max_entries)
            .field("eviction_policy", &self.inner.eviction_policy.name())
            .field("memory_entries", &state.memory.len())
            .field("persistent_entries", &state.persisted.len())
            .field("persistent", &self.inner.persistent.is_some())
            .finish()
    }
}
