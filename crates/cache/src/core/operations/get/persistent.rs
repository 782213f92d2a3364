//! Read-through from the persistent tier

use crate::entry::{CacheEntry, Tier};
use crate::errors::Result;
use crate::serialization::IndexEntry;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::core::internal::TierState;
use crate::core::types::CacheStore;

impl CacheStore {
    /// Load an entry from the persistent tier into memory
    pub(super) fn read_through(
        &self,
        state: &mut TierState,
        combined: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Value>> {
        let inner = &self.inner;

        let record = match inner.read_record(combined) {
            Ok(Some(record)) => record,
            Ok(None) => {
                // The index may still list a record that vanished underneath us
                if state.persisted.remove(combined).is_some() {
                    inner.sync_index(state);
                }
                inner.stats.record_miss();
                return Ok(None);
            }
            Err(e) => {
                inner.stats.record_miss();
                inner.stats.record_error();
                if e.is_corruption() {
                    tracing::warn!(key = combined, error = %e, "Dropping unreadable persisted entry");
                    inner.forget_persisted(state, combined);
                }
                return Err(e);
            }
        };

        if record.is_expired(now) {
            inner.forget_persisted(state, combined);
            inner.stats.record_expired(1);
            inner.stats.record_miss();
            tracing::debug!(key = combined, "Persisted cache entry expired");
            return Ok(None);
        }

        let encrypted = record.payload.is_encrypted();
        let value = match inner.open_payload(combined, record.payload) {
            Ok(value) => value,
            Err(e) => {
                inner.stats.record_miss();
                inner.stats.record_error();
                tracing::warn!(key = combined, error = %e, "Dropping persisted entry that cannot be decoded");
                inner.forget_persisted(state, combined);
                return Err(e);
            }
        };

        // A record the index lost track of counts as a new entry again
        if !state.persisted.contains_key(combined) {
            if let Err(e) = inner.ensure_capacity(state, record.priority) {
                inner.stats.record_miss();
                inner.stats.record_error();
                return Err(e);
            }
        }

        let tick = state.next_tick();
        let entry = CacheEntry {
            namespace: record.namespace,
            key: record.key,
            value: value.clone(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            last_accessed_at: now,
            access_count: 1,
            priority: record.priority,
            metadata: record.metadata,
            tier: Tier::Both,
            encrypted,
            size_bytes: record.size_bytes,
            access_tick: tick,
        };

        // Also records the read time for entries the index already knew
        state
            .persisted
            .insert(combined.to_string(), IndexEntry::from(&entry));
        inner.sync_index(state);
        state.memory.insert(combined.to_string(), entry);

        inner.stats.record_hit();
        tracing::debug!(key = combined, "Promoted persisted entry into memory");
        Ok(Some(value))
    }
}
