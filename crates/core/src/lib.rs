//! Core types, errors, and constants shared by the `tiercache` crates.
//!
//! ## Key Components
//!
//! - **`errors`**: the workspace-level `Error` enum and `Result` alias used for
//!   configuration and environment failures.
//! - **`clock`**: the `Clock` abstraction every time-dependent component reads
//!   "now" from, with a system implementation and a manually driven one for
//!   simulations and tests.
//! - **`constants`**: environment variable names and shared defaults.

pub mod clock;
pub mod constants;
pub mod errors;

pub use self::{
    clock::{Clock, ManualClock, SystemClock},
    constants::*,
    errors::{Error, Result},
};
