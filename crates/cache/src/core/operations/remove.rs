//! Cache remove operations

use crate::keys::combined_key;

use super::super::types::CacheStore;

impl CacheStore {
    /// Remove an entry from both tiers
    ///
    /// Idempotent: removing a missing entry is not an error. Returns whether
    /// anything was removed.
    pub fn remove(&self, namespace: &str, key: &str) -> bool {
        let combined = match combined_key(namespace, key) {
            Ok(combined) => combined,
            Err(e) => {
                tracing::debug!(namespace, key, error = %e, "Ignoring remove of invalid key");
                return false;
            }
        };

        let mut guard = self.inner.state.lock();
        let removed = self.inner.purge_entry(&mut guard, &combined);
        if removed {
            self.inner.stats.record_removal();
            tracing::debug!(key = %combined, "Removed cache entry");
        }
        removed
    }
}
