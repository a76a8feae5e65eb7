//! Key-value persistence backends
//!
//! The role definition store only needs string values under string keys.
//! Any backend satisfying [`KeyValueStore`] can hold the policy: an
//! in-memory map, files on disk, or a remote configuration service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StorageResult;

/// Key-value store trait for role definition persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Remove the value under `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory key-value store.
///
/// This is suitable for single-process applications and testing.
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> StorageResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(feature = "file")]
mod file_store {
    use super::*;
    use crate::error::StorageError;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    /// File-backed key-value store.
    ///
    /// Each key is one JSON file under the data directory. Writes go to a
    /// temporary file that is renamed over the target, so readers never see
    /// a half-written value.
    #[derive(Debug, Clone)]
    pub struct FileKeyValueStore {
        dir: PathBuf,
    }

    impl FileKeyValueStore {
        /// Create a store rooted at `dir`. The directory is created on the
        /// first write.
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        /// Directory holding the value files.
        pub fn dir(&self) -> &Path {
            &self.dir
        }

        fn file_for(&self, key: &str) -> StorageResult<PathBuf> {
            let valid = !key.is_empty()
                && !key.starts_with('.')
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
            if !valid {
                return Err(StorageError::InvalidKey(key.to_string()));
            }
            Ok(self.dir.join(format!("{}.json", key)))
        }
    }

    #[async_trait]
    impl KeyValueStore for FileKeyValueStore {
        async fn get(&self, key: &str) -> StorageResult<Option<String>> {
            let path = self.file_for(key)?;
            match tokio::fs::read_to_string(&path).await {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        async fn set(&self, key: &str, value: String) -> StorageResult<()> {
            let path = self.file_for(key)?;
            tokio::fs::create_dir_all(&self.dir).await?;

            let tmp = self.dir.join(format!(".{}.tmp", key));
            tokio::fs::write(&tmp, value).await?;
            tokio::fs::rename(&tmp, &path).await?;

            tracing::trace!(path = %path.display(), "Wrote value file");
            Ok(())
        }

        async fn remove(&self, key: &str) -> StorageResult<()> {
            let path = self.file_for(key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }
    }
}

#[cfg(feature = "file")]
pub use file_store::FileKeyValueStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.get("roleDefinitions").await.unwrap(), None);

        store.set("roleDefinitions", "[]".to_string()).await.unwrap();
        assert_eq!(
            store.get("roleDefinitions").await.unwrap().as_deref(),
            Some("[]")
        );

        store.remove("roleDefinitions").await.unwrap();
        store.remove("roleDefinitions").await.unwrap();
        assert_eq!(store.get("roleDefinitions").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemoryKeyValueStore::new();
        let clone = store.clone();
        clone.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(store.len().await, 1);
    }

    #[cfg(feature = "file")]
    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("policy"));

        assert_eq!(store.get("roleDefinitions").await.unwrap(), None);

        store.set("roleDefinitions", "[1]".to_string()).await.unwrap();
        store.set("roleDefinitions", "[2]".to_string()).await.unwrap();
        assert_eq!(
            store.get("roleDefinitions").await.unwrap().as_deref(),
            Some("[2]")
        );
        assert!(dir.path().join("policy/roleDefinitions.json").exists());
        assert!(!dir.path().join("policy/.roleDefinitions.tmp").exists());

        store.remove("roleDefinitions").await.unwrap();
        store.remove("roleDefinitions").await.unwrap();
        assert_eq!(store.get("roleDefinitions").await.unwrap(), None);
    }

    #[cfg(feature = "file")]
    #[tokio::test]
    async fn test_file_store_rejects_unsafe_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            let err = store.set(key, "x".to_string()).await.unwrap_err();
            assert!(matches!(err, crate::error::StorageError::InvalidKey(_)), "{key}");
        }
    }
}
