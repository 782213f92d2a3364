//! Core types for rate limiter functionality.

/// Why a call to [`RateLimiter::execute`](super::RateLimiter::execute) did not
/// produce a value
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError<E> {
    /// The unit of work ran and returned this error
    #[error("unit of work failed: {0}")]
    Failed(E),

    /// The work was still queued when the limiter was cleared
    #[error("rate limiter queue was cleared before the work started")]
    Cleared,

    /// The unit of work panicked while running
    #[error("unit of work panicked")]
    Panicked,
}

impl<E> ExecuteError<E> {
    /// True when the work never started because of `clear()`
    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }

    /// The unit of work's own error, if that is what happened
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Cleared | Self::Panicked => None,
        }
    }
}

/// Worker state of a limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimiterState {
    /// No queued work and no worker running
    Idle,
    /// A worker is pacing through the queue
    Draining,
}
