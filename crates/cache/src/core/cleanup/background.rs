//! Background expiry sweep

use std::sync::Arc;
use std::time::Duration;

use crate::core::types::CacheStore;

impl CacheStore {
    /// Periodically call [`purge_expired`](Self::purge_expired) on a tokio task
    ///
    /// The task holds only a weak reference and stops once the last clone
    /// of the cache is dropped. Calling this again replaces the previous
    /// sweep. A zero interval starts nothing.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn spawn_expiry_sweep(&self, interval: Duration) {
        if interval == Duration::ZERO {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                CacheStore { inner }.purge_expired();
            }
        });

        if let Some(previous) = self.inner.sweep_handle.lock().replace(handle) {
            previous.abort();
        }
        tracing::debug!(interval_ms = interval.as_millis() as u64, "Started expiry sweep");
    }
}
