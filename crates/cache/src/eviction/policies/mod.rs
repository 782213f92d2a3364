//! Eviction policy implementations

mod lfu;
mod lru;

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
