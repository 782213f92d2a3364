//! Core error types for the cache

use crate::codec::CodecError;
use crate::storage::StoreError;
use std::time::Duration;

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error type for cache operations
#[derive(Debug)]
pub enum CacheError {
    /// The persistent store rejected or failed an operation
    Storage {
        key: String,
        operation: &'static str,
        source: StoreError,
        recovery_hint: RecoveryHint,
    },

    /// Encrypting or decrypting a payload failed
    Codec {
        key: String,
        operation: &'static str,
        source: CodecError,
        recovery_hint: RecoveryHint,
    },

    /// A value could not be converted to or from JSON
    Serialization {
        key: String,
        operation: SerializationOp,
        source: serde_json::Error,
        recovery_hint: RecoveryHint,
    },

    /// A persisted record could not be understood
    Corruption {
        key: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// A persisted record was written by an incompatible format version
    VersionMismatch {
        key: String,
        expected_version: u32,
        actual_version: u32,
        recovery_hint: RecoveryHint,
    },

    /// Invalid namespace or key
    InvalidKey {
        key: String,
        reason: String,
        recovery_hint: RecoveryHint,
    },

    /// The configured ceiling on critical entries was reached
    CapacityExceeded {
        critical_entries: usize,
        limit: usize,
        recovery_hint: RecoveryHint,
    },

    /// Configuration error
    Configuration {
        message: String,
        recovery_hint: RecoveryHint,
    },
}

/// Recovery hints for error handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryHint {
    /// Retry the operation
    Retry { after: Duration },

    /// Clear the cache and retry
    ClearAndRetry,

    /// Increase storage capacity
    IncreaseCapacity { suggested_bytes: u64 },

    /// No automated recovery possible
    Manual { instructions: String },

    /// Operation can be safely ignored; the cache degrades to a miss
    Ignore,

    /// Use a default value
    UseDefault { value: String },

    /// Update cache configuration
    UpdateConfiguration,
}

/// Serialization operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationOp {
    Encode,
    Decode,
}
