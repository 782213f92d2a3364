use super::{PersistentStore, StoreError};
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tiercache_utils::write_atomic_string;
use walkdir::WalkDir;

/// Persistent store keeping one file per key under a directory
///
/// File names are the SHA-256 of the key, sharded two levels deep so no
/// directory grows unbounded. Only file contents count against the quota.
/// Writes go through a temporary file and a rename, so a crash never leaves
/// a half-written record behind.
pub struct FileStore {
    root: PathBuf,
    quota_bytes: Option<u64>,
    used_bytes: Mutex<u64>,
}

impl FileStore {
    /// Open (or create) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_quota(root, None)
    }

    /// Open a store whose files may not exceed `quota_bytes` in total
    ///
    /// Existing files count against the quota.
    pub fn open_with_quota(
        root: impl Into<PathBuf>,
        quota_bytes: Option<u64>,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            operation: "create store directory".to_string(),
            source,
        })?;

        let used_bytes = disk_usage(&root);
        tracing::debug!(
            root = %root.display(),
            used_bytes,
            ?quota_bytes,
            "Opened file store"
        );

        Ok(Self {
            root,
            quota_bytes,
            used_bytes: Mutex::new(used_bytes),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn used_bytes(&self) -> u64 {
        *self.used_bytes.lock()
    }

    fn record_path(&self, key: &str) -> PathBuf {
        let hash = hash_key(key);
        self.root.join(&hash[..2]).join(&hash[2..4]).join(hash)
    }
}

/// Hash a store key using SHA-256
fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

fn disk_usage(root: &Path) -> u64 {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

fn existing_len(path: &Path) -> u64 {
    fs::metadata(path).map_or(0, |metadata| metadata.len())
}

impl PersistentStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                operation: "read record".to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.record_path(key);
        let mut used = self.used_bytes.lock();
        let replaced = existing_len(&path);
        let requested = value.len() as u64;

        if let Some(quota) = self.quota_bytes {
            let available = quota.saturating_sub(used.saturating_sub(replaced));
            if requested > available {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    available,
                });
            }
        }

        write_atomic_string(&path, &value).map_err(|e| match e {
            tiercache_core::Error::FileSystem {
                operation, source, ..
            } => StoreError::Io {
                key: key.to_string(),
                operation,
                source,
            },
            other => StoreError::Unavailable {
                reason: other.to_string(),
            },
        })?;

        *used = used.saturating_sub(replaced) + requested;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.record_path(key);
        let mut used = self.used_bytes.lock();
        let len = existing_len(&path);
        match fs::remove_file(&path) {
            Ok(()) => {
                *used = used.saturating_sub(len);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                operation: "remove record".to_string(),
                source,
            }),
        }
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("root", &self.root)
            .field("used_bytes", &*self.used_bytes.lock())
            .field("quota_bytes", &self.quota_bytes)
            .finish()
    }
}
