//! Namespaced cache keys
//!
//! Every entry is addressed by a namespace and a key, stored under the
//! combined key `namespace:key`.

use crate::errors::{CacheError, Result};
use tiercache_core::{MAX_KEY_LENGTH, NAMESPACE_SEPARATOR};

/// Validation for the two halves of a cache address
pub trait CacheKey: AsRef<str> {
    /// Keys must be non-empty, at most [`MAX_KEY_LENGTH`] bytes and free of NUL bytes
    fn validate(&self) -> Result<()> {
        let key = self.as_ref();
        if key.is_empty() {
            return Err(CacheError::invalid_key(key, "key cannot be empty"));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::invalid_key(
                truncated(key),
                format!("key exceeds maximum length of {MAX_KEY_LENGTH} bytes"),
            ));
        }
        if key.contains('\0') {
            return Err(CacheError::invalid_key(key, "key contains NUL bytes"));
        }
        Ok(())
    }

    /// Namespaces follow the key rules and additionally cannot contain the separator
    fn validate_namespace(&self) -> Result<()> {
        let namespace = self.as_ref();
        self.validate()?;
        if namespace.contains(NAMESPACE_SEPARATOR) {
            return Err(CacheError::invalid_key(
                namespace,
                format!("namespace cannot contain '{NAMESPACE_SEPARATOR}'"),
            ));
        }
        Ok(())
    }
}

impl CacheKey for str {}
impl CacheKey for String {}

/// Validate both halves and build the combined key
pub fn combined_key(namespace: &str, key: &str) -> Result<String> {
    namespace.validate_namespace()?;
    key.validate()?;
    Ok(format!("{namespace}{NAMESPACE_SEPARATOR}{key}"))
}

fn truncated(key: &str) -> String {
    let mut end = 64.min(key.len());
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &key[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_key_format() {
        assert_eq!(combined_key("geo", "52.5200,13.4050").unwrap(), "geo:52.5200,13.4050");
        // Only the namespace is restricted; keys may contain the separator
        assert_eq!(combined_key("user", "a:b").unwrap(), "user:a:b");
    }

    #[test]
    fn test_invalid_keys_rejected() {
        assert!(combined_key("", "k").is_err());
        assert!(combined_key("ns", "").is_err());
        assert!(combined_key("n:s", "k").is_err());
        assert!(combined_key("ns", "a\0b").is_err());
        assert!(combined_key("ns", &"x".repeat(MAX_KEY_LENGTH + 1)).is_err());
        assert!(combined_key("ns", &"x".repeat(MAX_KEY_LENGTH)).is_ok());
    }

    #[test]
    fn test_overlong_key_is_truncated_in_error() {
        let err = "é".repeat(MAX_KEY_LENGTH).validate().unwrap_err();
        match err {
            CacheError::InvalidKey { key, .. } => assert!(key.len() < 80),
            other => panic!("unexpected error: {other}"),
        }
    }
}
