//! Capacity enforcement

use crate::entry::Priority;
use crate::errors::{CacheError, RecoveryHint, Result};

use super::internal::TierState;
use super::types::StoreInner;

impl StoreInner {
    /// Make room for one new key
    ///
    /// At capacity exactly one non-critical entry is evicted. When every
    /// entry is critical the cache grows past `max_entries` instead, unless
    /// a critical ceiling is configured and a critical entry is being added.
    pub(super) fn ensure_capacity(&self, state: &mut TierState, priority: Priority) -> Result<()> {
        if priority == Priority::Critical {
            if let Some(limit) = self.config.max_critical_entries {
                let critical_entries = state.critical_count();
                if critical_entries >= limit {
                    return Err(CacheError::CapacityExceeded {
                        critical_entries,
                        limit,
                        recovery_hint: RecoveryHint::Manual {
                            instructions: "Remove critical entries or raise max_critical_entries"
                                .to_string(),
                        },
                    });
                }
            }
        }

        let count = state.entry_count();
        if count < self.config.max_entries {
            return Ok(());
        }

        let victim = {
            let candidates = state.eviction_candidates();
            self.eviction_policy
                .select_victim(&candidates)
                .map(str::to_owned)
        };

        match victim {
            Some(victim) => {
                self.purge_entry(state, &victim);
                self.stats.record_eviction();
                tracing::debug!(
                    key = %victim,
                    policy = self.eviction_policy.name(),
                    "Evicted entry to make room"
                );
            }
            None => {
                tracing::warn!(
                    entries = count,
                    max_entries = self.config.max_entries,
                    "Cache is saturated with critical entries, growing past max_entries"
                );
            }
        }

        Ok(())
    }
}
