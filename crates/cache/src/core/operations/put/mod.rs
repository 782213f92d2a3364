//! Cache set operations

mod persistent;

use crate::entry::{CacheEntry, SetOptions, Tier};
use crate::errors::{CacheError, Result, SerializationOp};
use crate::keys::combined_key;
use crate::serialization::estimate_size;
use serde::Serialize;
use tiercache_core::clock::add_duration;

use crate::core::types::CacheStore;

impl CacheStore {
    /// Store a value, returning `false` instead of an error on failure
    ///
    /// A `false` return after a persistent-tier failure still leaves the
    /// value readable from memory.
    pub fn set<T>(&self, namespace: &str, key: &str, value: &T, options: SetOptions) -> bool
    where
        T: Serialize + ?Sized,
    {
        match self.try_set(namespace, key, value, options) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(namespace, key, error = %e, "Cache write failed");
                false
            }
        }
    }

    /// Store a value in memory and, unless `options.tier` is
    /// [`Tier::Memory`], write it through to the persistent tier
    ///
    /// Adding a key to a full cache evicts one non-critical entry first.
    pub fn try_set<T>(&self, namespace: &str, key: &str, value: &T, options: SetOptions) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let inner = &self.inner;

        let combined = match combined_key(namespace, key) {
            Ok(combined) => combined,
            Err(e) => {
                inner.stats.record_error();
                return Err(e);
            }
        };

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                inner.stats.record_error();
                return Err(CacheError::serialization(
                    combined,
                    SerializationOp::Encode,
                    e,
                ));
            }
        };

        let now = inner.clock.now();
        let expires_at = options
            .expires_in
            .or(inner.config.default_ttl)
            .and_then(|ttl| add_duration(now, ttl));
        let size_bytes = estimate_size(&combined, &value);

        let mut guard = inner.state.lock();
        let state = &mut *guard;

        let replaces_expired = state
            .memory
            .get(&combined)
            .map(|entry| entry.is_expired(now))
            .or_else(|| state.persisted.get(&combined).map(|entry| entry.is_expired(now)))
            .unwrap_or(false);
        if replaces_expired {
            inner.stats.record_expired(1);
        }

        if !state.contains(&combined) {
            if let Err(e) = inner.ensure_capacity(state, options.priority) {
                inner.stats.record_error();
                return Err(e);
            }
        }

        let tick = state.next_tick();
        let entry = CacheEntry {
            namespace: namespace.to_string(),
            key: key.to_string(),
            value,
            created_at: now,
            expires_at,
            last_accessed_at: now,
            access_count: 0,
            priority: options.priority,
            metadata: options.metadata,
            tier: Tier::Memory,
            encrypted: options.encrypt,
            size_bytes,
            access_tick: tick,
        };

        let write_through = options.tier.includes_persistent() && inner.persistent.is_some();
        let result = if write_through {
            self.write_through(state, combined, entry)
        } else {
            // A persisted copy would now be older than memory
            if state.persisted.contains_key(&combined) {
                inner.forget_persisted(state, &combined);
            }
            state.memory.insert(combined, entry);
            Ok(())
        };

        inner.stats.record_write();
        result
    }
}
