//! Write-through to the persistent tier

use crate::entry::{CacheEntry, Tier};
use crate::errors::Result;

use crate::core::internal::TierState;
use crate::core::types::CacheStore;

impl CacheStore {
    /// Persist an entry, then keep it in memory whatever the outcome
    ///
    /// When persisting fails the memory copy stays authoritative and any
    /// older persisted copy is removed.
    pub(super) fn write_through(
        &self,
        state: &mut TierState,
        combined: String,
        mut entry: CacheEntry,
    ) -> Result<()> {
        let inner = &self.inner;

        match inner.write_record(state, &combined, &entry) {
            Ok(()) => {
                entry.tier = Tier::Both;
                state.memory.insert(combined, entry);
                Ok(())
            }
            Err(e) => {
                inner.stats.record_error();
                tracing::warn!(
                    key = %combined,
                    error = %e,
                    "Persistent write failed, keeping entry in memory only"
                );
                inner.forget_persisted(state, &combined);
                state.memory.insert(combined, entry);
                Err(e)
            }
        }
    }
}
