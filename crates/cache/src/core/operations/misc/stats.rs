//! Cache statistics operations

use crate::stats::CacheStatistics;

use crate::core::types::CacheStore;

impl CacheStore {
    /// Snapshot of counters and tier sizes
    pub fn stats(&self) -> CacheStatistics {
        let sizes = self.inner.state.lock().sizes();
        self.inner.stats.snapshot(sizes)
    }
}
