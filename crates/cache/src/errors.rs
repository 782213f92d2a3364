//! Error handling for the cache
//!
//! Every failure carries a [`RecoveryHint`] so callers that do look at errors
//! (through `try_get`/`try_set`) can decide what to do without matching on
//! every variant.

mod conversions;
mod display;
mod recovery;
mod types;

pub use types::*;
