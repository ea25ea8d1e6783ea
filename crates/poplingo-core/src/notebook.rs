use std::sync::Arc;

use poplingo_types::{DictionaryEntry, EntryId, EntryUpdate};
use tokio::sync::Mutex;

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// The user's saved collection, newest first, unique by id.
///
/// The lock doubles as the single-writer guard: every mutation serializes the
/// candidate collection, writes it through to the store and only then commits
/// it to memory, all while holding the lock.
pub struct Notebook {
    entries: Mutex<Vec<DictionaryEntry>>,
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl Notebook {
    /// Load the collection document. A missing document is an empty notebook;
    /// a corrupt one is an error and is left untouched.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let key = key.into();

        let entries = match store.get(&key).await? {
            Some(data) => serde_json::from_str(&data).map_err(StorageError::Corrupt)?,
            None => Vec::new(),
        };

        tracing::info!("Loaded notebook '{}' with {} entries", key, entries.len());

        Ok(Self {
            entries: Mutex::new(entries),
            store,
            key,
        })
    }

    pub async fn entries(&self) -> Vec<DictionaryEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn get(&self, id: EntryId) -> Option<DictionaryEntry> {
        self.entries.lock().await.iter().find(|e| e.id == id).cloned()
    }

    pub async fn contains(&self, id: EntryId) -> bool {
        self.entries.lock().await.iter().any(|e| e.id == id)
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Insert at the front unless the id is already saved.
    /// Returns whether the collection changed.
    pub async fn save(&self, entry: DictionaryEntry) -> Result<bool, StorageError> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|e| e.id == entry.id) {
            tracing::debug!("Entry {} already saved", entry.id);
            return Ok(false);
        }

        let mut candidate = Vec::with_capacity(entries.len() + 1);
        candidate.push(entry);
        candidate.extend(entries.iter().cloned());

        self.commit(&mut entries, candidate).await?;
        Ok(true)
    }

    /// Remove by id. Returns whether the collection changed.
    pub async fn delete(&self, id: EntryId) -> Result<bool, StorageError> {
        let mut entries = self.entries.lock().await;
        if !entries.iter().any(|e| e.id == id) {
            return Ok(false);
        }

        let candidate = entries.iter().filter(|e| e.id != id).cloned().collect();
        self.commit(&mut entries, candidate).await?;
        Ok(true)
    }

    /// Merge `update` into the saved entry with `id`, if any.
    /// Returns whether an entry matched.
    pub async fn update(&self, id: EntryId, update: &EntryUpdate) -> Result<bool, StorageError> {
        let mut entries = self.entries.lock().await;
        let Some(index) = entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let mut candidate = entries.clone();
        candidate[index].apply(update);

        self.commit(&mut entries, candidate).await?;
        Ok(true)
    }

    async fn commit(
        &self,
        entries: &mut Vec<DictionaryEntry>,
        candidate: Vec<DictionaryEntry>,
    ) -> Result<(), StorageError> {
        let data = serde_json::to_string(&candidate).map_err(StorageError::Serialize)?;
        self.store.set(&self.key, &data).await?;
        *entries = candidate;

        tracing::debug!("Persisted notebook ({} entries)", entries.len());
        Ok(())
    }
}
