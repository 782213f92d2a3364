//! Two-tier cache implementation
//!
//! - One lock guards both tiers, so every operation is atomic
//! - Persistent store calls are synchronous and happen under that lock
//! - Errors are explicit: `try_*` surface them, everything else logs and counts

mod builder;
mod cleanup;
mod eviction;
mod internal;
mod operations;
mod tiers;
mod types;

pub use builder::CacheStoreBuilder;
pub use types::CacheStore;

#[cfg(test)]
mod tests;
