//! Eviction policies for capacity management
//!
//! A policy looks at a snapshot of every live entry and names the one to drop
//! when a new key would push the cache past `max_entries`. Critical entries
//! are never candidates, whatever the policy.

mod factory;
mod policies;
mod traits;

// Re-export public API
pub use factory::create_eviction_policy;
pub use policies::{LfuPolicy, LruPolicy};
pub use traits::{EvictionCandidate, EvictionPolicy};

#[cfg(test)]
mod tests;
