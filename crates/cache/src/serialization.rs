//! On-disk representation of the persistent tier
//!
//! Each entry is one JSON record under `<prefix><namespace>:<key>`. A single
//! index record under `<prefix>__index__` lists every persisted entry so the
//! tier can be enumerated without scanning the store; it is the snapshot
//! loaded when a cache is built.

use crate::entry::{is_expired_at, CacheEntry, Priority};
use crate::errors::{CacheError, Result, SerializationOp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tiercache_core::NAMESPACE_SEPARATOR;

/// Format version written into every record and index
pub const FORMAT_VERSION: u32 = 1;

/// Suffix of the index record key
pub const INDEX_KEY: &str = "__index__";

/// Persisted payload, plain JSON or base64 ciphertext
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Plain(Value),
    Encrypted(String),
}

impl Payload {
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub version: u32,
    pub namespace: String,
    pub key: String,
    pub payload: Payload,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub size_bytes: u64,
}

impl PersistedRecord {
    pub fn from_entry(entry: &CacheEntry, payload: Payload) -> Self {
        Self {
            version: FORMAT_VERSION,
            namespace: entry.namespace.clone(),
            key: entry.key.clone(),
            payload,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
            priority: entry.priority,
            metadata: entry.metadata.clone(),
            size_bytes: entry.size_bytes,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired_at(self.expires_at, now)
    }
}

/// Per-entry summary kept in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub namespace: String,
    pub key: String,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_accessed_at: DateTime<Utc>,
    pub size_bytes: u64,
}

impl IndexEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        is_expired_at(self.expires_at, now)
    }
}

impl From<&CacheEntry> for IndexEntry {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            namespace: entry.namespace.clone(),
            key: entry.key.clone(),
            priority: entry.priority,
            created_at: entry.created_at,
            expires_at: entry.expires_at,
            last_accessed_at: entry.last_accessed_at,
            size_bytes: entry.size_bytes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PersistedIndex {
    version: u32,
    entries: BTreeMap<String, IndexEntry>,
}

#[derive(Serialize)]
struct PersistedIndexRef<'a> {
    version: u32,
    entries: &'a BTreeMap<String, IndexEntry>,
}

pub fn encode_record(combined: &str, record: &PersistedRecord) -> Result<String> {
    serde_json::to_string(record)
        .map_err(|e| CacheError::serialization(combined, SerializationOp::Encode, e))
}

pub fn decode_record(combined: &str, raw: &str) -> Result<PersistedRecord> {
    let record: PersistedRecord = serde_json::from_str(raw)
        .map_err(|e| CacheError::corruption(combined, format!("unreadable record: {e}")))?;
    check_version(combined, record.version)?;
    let owner = format!("{}{NAMESPACE_SEPARATOR}{}", record.namespace, record.key);
    if owner != combined {
        return Err(CacheError::corruption(
            combined,
            format!("record belongs to '{owner}'"),
        ));
    }
    Ok(record)
}

pub fn encode_index(entries: &BTreeMap<String, IndexEntry>) -> Result<String> {
    serde_json::to_string(&PersistedIndexRef {
        version: FORMAT_VERSION,
        entries,
    })
    .map_err(|e| CacheError::serialization(INDEX_KEY, SerializationOp::Encode, e))
}

pub fn decode_index(raw: &str) -> Result<BTreeMap<String, IndexEntry>> {
    let index: PersistedIndex = serde_json::from_str(raw)
        .map_err(|e| CacheError::corruption(INDEX_KEY, format!("unreadable index: {e}")))?;
    check_version(INDEX_KEY, index.version)?;
    Ok(index.entries)
}

fn check_version(key: &str, actual_version: u32) -> Result<()> {
    if actual_version == FORMAT_VERSION {
        Ok(())
    } else {
        Err(CacheError::VersionMismatch {
            key: key.to_string(),
            expected_version: FORMAT_VERSION,
            actual_version,
            recovery_hint: crate::errors::RecoveryHint::ClearAndRetry,
        })
    }
}

/// Size estimate: combined key plus serialized value
pub fn estimate_size(combined: &str, value: &Value) -> u64 {
    let value_len = serde_json::to_vec(value).map_or(0, |bytes| bytes.len());
    (combined.len() + value_len) as u64
}
