//! Recovery utilities for cache errors

use super::types::{CacheError, RecoveryHint};
use crate::storage::StoreError;

impl CacheError {
    /// Get the recovery hint for this error
    #[must_use]
    pub const fn recovery_hint(&self) -> &RecoveryHint {
        match self {
            Self::Storage { recovery_hint, .. }
            | Self::Codec { recovery_hint, .. }
            | Self::Serialization { recovery_hint, .. }
            | Self::Corruption { recovery_hint, .. }
            | Self::VersionMismatch { recovery_hint, .. }
            | Self::InvalidKey { recovery_hint, .. }
            | Self::CapacityExceeded { recovery_hint, .. }
            | Self::Configuration { recovery_hint, .. } => recovery_hint,
        }
    }

    /// Check if this error is transient and can be retried
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.recovery_hint(), RecoveryHint::Retry { .. })
    }

    /// Check if this error indicates unreadable persisted data
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::Corruption { .. } | Self::VersionMismatch { .. }
        )
    }

    /// Check if the persistent store ran out of space
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(
            self,
            Self::Storage {
                source: StoreError::QuotaExceeded { .. },
                ..
            }
        )
    }
}
