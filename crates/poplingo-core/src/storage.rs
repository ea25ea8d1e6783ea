use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;

/// Durable string documents addressed by key
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when nothing was ever stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the whole document under `key`
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Atomic replace
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(())
    }
}

/// In-process store, mostly for tests
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut docs) = store.documents.lock() {
            docs.insert(key.to_string(), value.to_string());
        }
        store
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let docs = self
            .documents
            .lock()
            .map_err(|_| std::io::Error::other("memory store poisoned"))?;
        Ok(docs.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut docs = self
            .documents
            .lock()
            .map_err(|_| std::io::Error::other("memory store poisoned"))?;
        docs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
