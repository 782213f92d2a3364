//! Cache get operations

mod persistent;

use crate::entry::GetOptions;
use crate::errors::{CacheError, Result, SerializationOp};
use crate::keys::combined_key;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::types::CacheStore;

impl CacheStore {
    /// Read a value, treating every failure as a miss
    ///
    /// Failures are logged and counted in [`stats`](Self::stats).
    pub fn get<T>(&self, namespace: &str, key: &str, options: GetOptions) -> Option<T>
    where
        T: DeserializeOwned,
    {
        match self.try_get(namespace, key, options) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(namespace, key, error = %e, "Cache read failed, treating as a miss");
                None
            }
        }
    }

    /// Read a value, surfacing storage, codec and decoding failures
    ///
    /// Looks in memory first, then (unless `options.tier` is
    /// [`Tier::Memory`](crate::Tier::Memory)) in the persistent tier,
    /// promoting what it finds. Expired entries are purged from both tiers
    /// and reported as a miss. Unreadable persisted records are purged too.
    pub fn try_get<T>(&self, namespace: &str, key: &str, options: GetOptions) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let combined = match combined_key(namespace, key) {
            Ok(combined) => combined,
            Err(e) => {
                self.inner.stats.record_miss();
                self.inner.stats.record_error();
                return Err(e);
            }
        };

        let value = match self.lookup(&combined, options) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(None),
            Err(e) => return Err(e),
        };

        match serde_json::from_value::<T>(value) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                self.inner.stats.record_error();
                Err(CacheError::serialization(
                    combined,
                    SerializationOp::Decode,
                    e,
                ))
            }
        }
    }

    fn lookup(&self, combined: &str, options: GetOptions) -> Result<Option<Value>> {
        let inner = &self.inner;
        let now = inner.clock.now();
        let mut guard = inner.state.lock();
        let state = &mut *guard;

        let expired = state.memory.get(combined).map(|entry| entry.is_expired(now));
        match expired {
            Some(true) => {
                inner.purge_entry(state, combined);
                inner.stats.record_expired(1);
                inner.stats.record_miss();
                tracing::debug!(key = combined, "Cache entry expired");
                return Ok(None);
            }
            Some(false) => {
                let tick = state.next_tick();
                if let Some(entry) = state.memory.get_mut(combined) {
                    entry.touch(now, tick);
                    let value = entry.value.clone();

                    // Recency must survive a restart, so the index follows every hit
                    if let Some(indexed) = state.persisted.get_mut(combined) {
                        indexed.last_accessed_at = now;
                        inner.sync_index(state);
                    }

                    inner.stats.record_hit();
                    tracing::trace!(key = combined, "Memory cache hit");
                    return Ok(Some(value));
                }
            }
            None => {}
        }

        if !options.tier.includes_persistent() || inner.persistent.is_none() {
            inner.stats.record_miss();
            tracing::trace!(key = combined, "Cache miss");
            return Ok(None);
        }

        self.read_through(state, combined, now)
    }
}
