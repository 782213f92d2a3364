//! Encryption seam for persisted payloads
//!
//! The cache never picks a cipher. Callers that need confidentiality at rest
//! hand an [`EncryptionCodec`] to the builder and request encryption per
//! entry with [`SetOptions::encrypted`](crate::SetOptions::encrypted).

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// Failure reported by an encryption codec
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("encryption failed: {0}")]
    Encrypt(String),

    #[error("decryption failed: {0}")]
    Decrypt(String),

    #[error("no encryption codec configured")]
    Missing,
}

/// Reversible byte transform applied to persisted payloads
pub trait EncryptionCodec: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// Encrypt then base64 encode, producing a string safe for string-only stores
pub(crate) fn seal(codec: &dyn EncryptionCodec, plaintext: &[u8]) -> Result<String, CodecError> {
    let ciphertext = codec.encrypt(plaintext)?;
    Ok(STANDARD.encode(ciphertext))
}

pub(crate) fn open(codec: &dyn EncryptionCodec, sealed: &str) -> Result<Vec<u8>, CodecError> {
    let ciphertext = STANDARD
        .decode(sealed)
        .map_err(|e| CodecError::Decrypt(format!("invalid base64: {e}")))?;
    codec.decrypt(&ciphertext)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// XOR "cipher" for exercising the encrypted path
    pub struct XorCodec(pub u8);

    impl EncryptionCodec for XorCodec {
        fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
            Ok(plaintext.iter().map(|b| b ^ self.0).collect())
        }

        fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CodecError> {
            Ok(ciphertext.iter().map(|b| b ^ self.0).collect())
        }
    }

    /// Codec whose decrypt always fails, as with a rotated key
    pub struct BrokenCodec;

    impl EncryptionCodec for BrokenCodec {
        fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
            Ok(plaintext.to_vec())
        }

        fn decrypt(&self, _ciphertext: &[u8]) -> Result<Vec<u8>, CodecError> {
            Err(CodecError::Decrypt("key rotated".to_string()))
        }
    }
}
