//! Shared utilities for tiercache
//!
//! - **`resilience`**: the request pacing [`RateLimiter`] that protects
//!   quota-limited external services.
//! - **`logging`**: `tracing` subscriber initialisation for binaries and tests.
//! - **`atomic_file`**: write-to-temp-then-rename helpers used by file-backed
//!   storage.

pub mod atomic_file;
pub mod logging;
pub mod resilience;

pub use atomic_file::*;
pub use resilience::*;
