//! Cache cleanup operations

mod background;

use super::types::CacheStore;

impl CacheStore {
    /// Purge every expired entry from both tiers
    ///
    /// Expiry is otherwise lazy: entries are dropped by the read that finds
    /// them expired. Returns the number of entries purged.
    pub fn purge_expired(&self) -> usize {
        let inner = &self.inner;
        let now = inner.clock.now();
        let mut guard = inner.state.lock();
        let state = &mut *guard;

        let mut expired: Vec<String> = state
            .memory
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        expired.extend(
            state
                .persisted
                .iter()
                .filter(|(key, entry)| entry.is_expired(now) && !state.memory.contains_key(*key))
                .map(|(key, _)| key.clone()),
        );

        for combined in &expired {
            inner.purge_entry(state, combined);
        }

        let purged = expired.len();
        if purged > 0 {
            inner.stats.record_expired(purged as u64);
            tracing::debug!(purged, "Purged expired cache entries");
        }
        purged
    }
}
