//! Cache clear operations

use crate::core::types::CacheStore;

impl CacheStore {
    /// Remove every entry from both tiers and reset the statistics
    ///
    /// Persistent store failures are logged; the memory tier and the index
    /// mirror are always emptied.
    pub fn clear(&self) {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        let memory_entries = state.memory.len();
        let persisted_entries = state.persisted.len();
        state.memory.clear();

        if let Some(store) = inner.persistent() {
            for combined in state.persisted.keys() {
                if let Err(e) = store.remove(&inner.config.record_key(combined)) {
                    tracing::warn!(key = %combined, error = %e, "Failed to remove persisted record during clear");
                }
            }
            if let Err(e) = store.remove(&inner.config.index_key()) {
                tracing::warn!(error = %e, "Failed to remove persistent index during clear");
            }
        }
        state.persisted.clear();

        inner.stats.reset(inner.clock.now());
        tracing::info!(memory_entries, persisted_entries, "Cleared cache");
    }

    /// Drop the memory tier only
    ///
    /// Persisted entries stay readable and are promoted again on their next
    /// read, as after a process restart. Entries that were never persisted
    /// are lost. Returns how many entries left memory.
    pub fn clear_memory(&self) -> usize {
        let mut state = self.inner.state.lock();
        let dropped = state.memory.len();
        state.memory.clear();
        tracing::debug!(dropped, "Cleared memory tier");
        dropped
    }
}
