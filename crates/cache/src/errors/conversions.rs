//! Constructors that pick a sensible recovery hint for each failure

use super::types::{CacheError, RecoveryHint, SerializationOp};
use crate::codec::CodecError;
use crate::storage::StoreError;
use std::time::Duration;

impl CacheError {
    /// Wrap a persistent store failure
    pub fn storage(key: impl Into<String>, operation: &'static str, source: StoreError) -> Self {
        let recovery_hint = match &source {
            StoreError::QuotaExceeded {
                requested,
                available,
                ..
            } => RecoveryHint::IncreaseCapacity {
                suggested_bytes: requested.saturating_sub(*available),
            },
            StoreError::Io { .. } => RecoveryHint::Retry {
                after: Duration::from_millis(100),
            },
            StoreError::Unavailable { .. } => RecoveryHint::Manual {
                instructions: "Check that the persistent store is reachable".to_string(),
            },
        };

        Self::Storage {
            key: key.into(),
            operation,
            source,
            recovery_hint,
        }
    }

    /// Wrap an encryption codec failure
    pub fn codec(key: impl Into<String>, operation: &'static str, source: CodecError) -> Self {
        Self::Codec {
            key: key.into(),
            operation,
            source,
            recovery_hint: RecoveryHint::Ignore,
        }
    }

    /// Wrap a JSON conversion failure
    pub fn serialization(
        key: impl Into<String>,
        operation: SerializationOp,
        source: serde_json::Error,
    ) -> Self {
        let recovery_hint = match operation {
            SerializationOp::Encode => RecoveryHint::Manual {
                instructions: "Value must be representable as JSON".to_string(),
            },
            SerializationOp::Decode => RecoveryHint::Manual {
                instructions: "Read the entry with the type it was written with".to_string(),
            },
        };

        Self::Serialization {
            key: key.into(),
            operation,
            source,
            recovery_hint,
        }
    }

    /// Persisted data that cannot be understood; the entry is dropped
    pub fn corruption(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corruption {
            key: key.into(),
            reason: reason.into(),
            recovery_hint: RecoveryHint::Ignore,
        }
    }

    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
            recovery_hint: RecoveryHint::Manual {
                instructions: "Use a non-empty key without NUL bytes and a namespace without ':'"
                    .to_string(),
            },
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            recovery_hint: RecoveryHint::UpdateConfiguration,
        }
    }
}

/// Surface cache failures through the workspace-wide error type
impl From<CacheError> for tiercache_core::Error {
    fn from(error: CacheError) -> Self {
        tiercache_core::Error::configuration(error.to_string())
    }
}
