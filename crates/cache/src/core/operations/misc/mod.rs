//! Miscellaneous cache operations

mod clear;
mod stats;

use crate::entry::{EntryMetadata, Tier};
use crate::keys::combined_key;

use crate::core::internal::TierState;
use crate::core::types::CacheStore;

/// Outcome of looking for an entry without touching it
enum Presence {
    Memory,
    Persisted,
    Absent,
}

impl CacheStore {
    /// Check whether a live entry exists
    ///
    /// Does not count as an access. Expired entries are purged.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        let Ok(combined) = combined_key(namespace, key) else {
            return false;
        };

        let mut guard = self.inner.state.lock();
        !matches!(self.presence(&mut guard, &combined), Presence::Absent)
    }

    /// Everything about an entry except its value
    ///
    /// Does not count as an access. Expired entries are purged.
    pub fn metadata(&self, namespace: &str, key: &str) -> Option<EntryMetadata> {
        let combined = combined_key(namespace, key).ok()?;

        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        match self.presence(state, &combined) {
            Presence::Absent => None,
            Presence::Memory => state.memory.get(&combined).map(EntryMetadata::from),
            Presence::Persisted => {
                let record = match self.inner.read_record(&combined) {
                    Ok(Some(record)) => record,
                    Ok(None) => return None,
                    Err(e) => {
                        self.inner.stats.record_error();
                        tracing::warn!(key = %combined, error = %e, "Failed to read persisted entry metadata");
                        return None;
                    }
                };
                let indexed = state.persisted.get(&combined)?;

                Some(EntryMetadata {
                    namespace: record.namespace,
                    key: record.key,
                    created_at: record.created_at,
                    expires_at: record.expires_at,
                    last_accessed_at: indexed.last_accessed_at,
                    access_count: 0,
                    priority: record.priority,
                    tier: Tier::Persistent,
                    encrypted: record.payload.is_encrypted(),
                    size_bytes: record.size_bytes,
                    metadata: record.metadata,
                })
            }
        }
    }

    fn presence(&self, state: &mut TierState, combined: &str) -> Presence {
        let inner = &self.inner;
        let now = inner.clock.now();

        if let Some(entry) = state.memory.get(combined) {
            if !entry.is_expired(now) {
                return Presence::Memory;
            }
            inner.purge_entry(state, combined);
            inner.stats.record_expired(1);
            return Presence::Absent;
        }

        match state.persisted.get(combined) {
            Some(entry) if entry.is_expired(now) => {
                inner.forget_persisted(state, combined);
                inner.stats.record_expired(1);
                Presence::Absent
            }
            Some(_) => Presence::Persisted,
            None => Presence::Absent,
        }
    }
}
