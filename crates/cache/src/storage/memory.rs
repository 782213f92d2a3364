use super::{record_size, PersistentStore, StoreError};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct MemoryState {
    records: HashMap<String, String>,
    used_bytes: u64,
}

/// In-process persistent store bounded by a byte quota
///
/// Key and value bytes both count against the quota. A write that would
/// exceed it fails with [`StoreError::QuotaExceeded`] and leaves the previous
/// value in place.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    quota_bytes: Option<u64>,
}

impl MemoryStore {
    /// Unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn used_bytes(&self) -> u64 {
        self.state.lock().used_bytes
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.lock().records.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.state.lock().records.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let replaced = state
            .records
            .get(key)
            .map_or(0, |old| record_size(key, old));
        let requested = record_size(key, &value);

        if let Some(quota) = self.quota_bytes {
            let available = quota.saturating_sub(state.used_bytes - replaced);
            if requested > available {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    available,
                });
            }
        }

        state.used_bytes = state.used_bytes - replaced + requested;
        state.records.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        if let Some(old) = state.records.remove(key) {
            state.used_bytes -= record_size(key, &old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryStore")
            .field("records", &state.records.len())
            .field("used_bytes", &state.used_bytes)
            .field("quota_bytes", &self.quota_bytes)
            .finish()
    }
}
