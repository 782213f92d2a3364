//! Persistent tier bookkeeping
//!
//! Every helper here runs with the state lock held, so the index mirror and
//! the store never disagree for longer than one operation.

use crate::codec::{open, seal, CodecError};
use crate::entry::CacheEntry;
use crate::errors::{CacheError, Result, SerializationOp};
use crate::serialization::{
    decode_record, encode_index, encode_record, IndexEntry, Payload, PersistedRecord,
};
use crate::storage::PersistentStore;
use serde_json::Value;

use super::internal::TierState;
use super::types::StoreInner;

impl StoreInner {
    /// The persistent store when one is configured
    pub(super) fn persistent(&self) -> Option<&dyn PersistentStore> {
        self.persistent.as_deref()
    }

    /// Rewrite the index record from the in-memory mirror
    pub(super) fn write_index(&self, state: &TierState) -> Result<()> {
        let Some(store) = self.persistent() else {
            return Ok(());
        };

        let encoded = match encode_index(&state.persisted) {
            Ok(encoded) => encoded,
            Err(e) => return Err(e),
        };

        store
            .set(&self.config.index_key(), encoded)
            .map_err(|source| CacheError::storage("__index__", "write index", source))
    }

    /// Write the index, logging instead of failing
    pub(super) fn sync_index(&self, state: &TierState) {
        if let Err(e) = self.write_index(state) {
            self.stats.record_error();
            tracing::warn!(error = %e, "Failed to update persistent index");
        }
    }

    /// Persist an entry and add it to the index
    ///
    /// On failure nothing new is left behind: the record is removed again if
    /// the index could not be updated.
    pub(super) fn write_record(
        &self,
        state: &mut TierState,
        combined: &str,
        entry: &CacheEntry,
    ) -> Result<()> {
        let Some(store) = self.persistent() else {
            return Ok(());
        };

        let payload = if entry.encrypted {
            match self.seal_value(combined, &entry.value) {
                Ok(sealed) => Payload::Encrypted(sealed),
                Err(e) => return Err(e),
            }
        } else {
            Payload::Plain(entry.value.clone())
        };

        let record = PersistedRecord::from_entry(entry, payload);
        let encoded = match encode_record(combined, &record) {
            Ok(encoded) => encoded,
            Err(e) => return Err(e),
        };

        let record_key = self.config.record_key(combined);
        match store.set(&record_key, encoded) {
            Ok(()) => {}
            Err(source) => {
                return Err(CacheError::storage(combined, "write entry record", source));
            }
        }

        let previous = state
            .persisted
            .insert(combined.to_string(), IndexEntry::from(entry));
        match self.write_index(state) {
            Ok(()) => Ok(()),
            Err(e) => {
                match previous {
                    Some(previous) => {
                        state.persisted.insert(combined.to_string(), previous);
                    }
                    None => {
                        state.persisted.remove(combined);
                    }
                }
                if let Err(remove_err) = store.remove(&record_key) {
                    tracing::warn!(key = combined, error = %remove_err, "Failed to roll back entry record");
                }
                Err(e)
            }
        }
    }

    /// Read and decode an entry record
    pub(super) fn read_record(&self, combined: &str) -> Result<Option<PersistedRecord>> {
        let Some(store) = self.persistent() else {
            return Ok(None);
        };

        let raw = match store.get(&self.config.record_key(combined)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(source) => {
                return Err(CacheError::storage(combined, "read entry record", source));
            }
        };

        decode_record(combined, &raw).map(Some)
    }

    /// Recover the JSON value from a persisted payload
    pub(super) fn open_payload(&self, combined: &str, payload: Payload) -> Result<Value> {
        match payload {
            Payload::Plain(value) => Ok(value),
            Payload::Encrypted(sealed) => {
                let Some(codec) = self.codec.as_deref() else {
                    return Err(CacheError::codec(combined, "decrypt", CodecError::Missing));
                };
                let plaintext = open(codec, &sealed)
                    .map_err(|source| CacheError::codec(combined, "decrypt", source))?;
                serde_json::from_slice(&plaintext).map_err(|e| {
                    CacheError::corruption(combined, format!("decrypted payload is not JSON: {e}"))
                })
            }
        }
    }

    fn seal_value(&self, combined: &str, value: &Value) -> Result<String> {
        let Some(codec) = self.codec.as_deref() else {
            return Err(CacheError::codec(combined, "encrypt", CodecError::Missing));
        };
        let plaintext = serde_json::to_vec(value)
            .map_err(|e| CacheError::serialization(combined, SerializationOp::Encode, e))?;
        seal(codec, &plaintext).map_err(|source| CacheError::codec(combined, "encrypt", source))
    }

    /// Drop the persisted copy of an entry; failures are logged
    ///
    /// Returns whether the index knew about the entry.
    pub(super) fn forget_persisted(&self, state: &mut TierState, combined: &str) -> bool {
        let Some(store) = self.persistent() else {
            return false;
        };

        if let Err(e) = store.remove(&self.config.record_key(combined)) {
            self.stats.record_error();
            tracing::warn!(key = combined, error = %e, "Failed to remove persisted record");
        }

        let indexed = state.persisted.remove(combined).is_some();
        if indexed {
            self.sync_index(state);
        }
        indexed
    }

    /// Remove an entry from both tiers; returns whether it existed
    pub(super) fn purge_entry(&self, state: &mut TierState, combined: &str) -> bool {
        let in_memory = state.memory.remove(combined).is_some();
        let persisted = self.forget_persisted(state, combined);
        in_memory || persisted
    }
}
