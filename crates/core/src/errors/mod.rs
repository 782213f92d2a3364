//! Error types for tiercache configuration and environment handling

mod builders;
mod conversions;
mod types;

pub use types::{Error, Result};
