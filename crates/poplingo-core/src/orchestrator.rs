use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use poplingo_gemini::AiGateway;
use poplingo_types::{DictionaryEntry, EntryId, EntryUpdate, LanguagePair};
use tokio::sync::Mutex;

use crate::error::{LookupError, StorageError};
use crate::notebook::Notebook;
use crate::preprocess::{Preprocessor, QueryPreprocessor};

/// Owns the notebook and the active search result.
///
/// All collection mutations go through `save`, `delete` and `update`.
pub struct EntryOrchestrator {
    gateway: Arc<dyn AiGateway>,
    notebook: Notebook,
    active: Mutex<Option<DictionaryEntry>>,
    /// Number of the most recently started search
    generation: AtomicU64,
}

impl EntryOrchestrator {
    pub fn new(gateway: Arc<dyn AiGateway>, notebook: Notebook) -> Self {
        Self {
            gateway,
            notebook,
            active: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn gateway(&self) -> Arc<dyn AiGateway> {
        self.gateway.clone()
    }

    /// Look up `query`, running definition and image generation concurrently.
    ///
    /// Definition failure fails the whole search. A missing image does not.
    /// Only the most recently started search may become the active result;
    /// older ones finishing later get `LookupError::Superseded`.
    pub async fn search(
        &self,
        query: &str,
        languages: &LanguagePair,
    ) -> Result<DictionaryEntry, LookupError> {
        let term = QueryPreprocessor.process(query);
        if term.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.active.lock().await = None;

        tracing::info!(
            "[SEARCH #{}] '{}' ({} -> {})",
            generation,
            term,
            languages.target,
            languages.native
        );

        let (definition, image_url) = tokio::join!(
            self.gateway.generate_definition(&term, languages),
            self.gateway.generate_image(&term),
        );

        let definition = match definition {
            Ok(definition) => definition,
            Err(e) => {
                tracing::error!("[SEARCH #{}] Definition failed: {}", generation, e);
                return Err(e.into());
            }
        };

        if image_url.is_none() {
            tracing::debug!("[SEARCH #{}] Continuing without image", generation);
        }

        let entry = DictionaryEntry::compose(term, languages, definition, image_url);

        let mut active = self.active.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("[SEARCH #{}] Superseded, discarding result", generation);
            return Err(LookupError::Superseded);
        }
        *active = Some(entry.clone());

        Ok(entry)
    }

    pub async fn active(&self) -> Option<DictionaryEntry> {
        self.active.lock().await.clone()
    }

    /// Saved entries, newest first
    pub async fn collection(&self) -> Vec<DictionaryEntry> {
        self.notebook.entries().await
    }

    pub async fn is_saved(&self, id: EntryId) -> bool {
        self.notebook.contains(id).await
    }

    /// Active result if it matches, otherwise the saved entry
    pub async fn find(&self, id: EntryId) -> Option<DictionaryEntry> {
        let active = self.active.lock().await.clone().filter(|e| e.id == id);
        match active {
            Some(entry) => Some(entry),
            None => self.notebook.get(id).await,
        }
    }

    /// Idempotent insert at the front of the notebook.
    ///
    /// When `entry` is the active result, the active copy is the one saved,
    /// with any fields merged into it since `entry` was taken.
    pub async fn save(&self, entry: DictionaryEntry) -> Result<bool, StorageError> {
        let active = self.active.lock().await;
        let id = entry.id;
        let entry = active
            .as_ref()
            .filter(|a| a.id == id)
            .cloned()
            .unwrap_or(entry);

        self.insert(entry).await
    }

    /// Save the active result, if there is one.
    /// Returns its term and whether the notebook changed.
    pub async fn save_active(&self) -> Result<Option<(String, bool)>, StorageError> {
        let active = self.active.lock().await;
        let Some(entry) = active.clone() else {
            return Ok(None);
        };

        let term = entry.term.clone();
        let saved = self.insert(entry).await?;
        Ok(Some((term, saved)))
    }

    // Callers hold the `active` lock
    async fn insert(&self, entry: DictionaryEntry) -> Result<bool, StorageError> {
        let saved = self.notebook.save(entry).await?;
        if saved {
            tracing::info!("Saved entry to notebook");
        }
        Ok(saved)
    }

    pub async fn delete(&self, id: EntryId) -> Result<bool, StorageError> {
        let deleted = self.notebook.delete(id).await?;
        if deleted {
            tracing::info!("Deleted entry {}", id);
        }
        Ok(deleted)
    }

    /// Merge `update` into every view of entry `id`: the active result and
    /// the saved copy. Returns whether anything matched.
    ///
    /// The saved copy is persisted first; if that fails the active result is
    /// left untouched too.
    pub async fn update(&self, id: EntryId, update: &EntryUpdate) -> Result<bool, StorageError> {
        if update.is_empty() {
            return Ok(false);
        }

        let mut active = self.active.lock().await;
        let saved_matched = self.notebook.update(id, update).await?;

        let active_matched = match active.as_mut().filter(|e| e.id == id) {
            Some(entry) => {
                entry.apply(update);
                true
            }
            None => false,
        };

        if !active_matched && !saved_matched {
            tracing::debug!("Update for unknown entry {} ignored", id);
        }

        Ok(active_matched || saved_matched)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::testing::FakeGateway;

    fn languages() -> LanguagePair {
        LanguagePair::new("English", "Spanish")
    }

    async fn orchestrator(gateway: FakeGateway) -> EntryOrchestrator {
        let notebook = Notebook::load(Arc::new(MemoryStore::new()), "notebook")
            .await
            .unwrap();
        EntryOrchestrator::new(Arc::new(gateway), notebook)
    }

    #[tokio::test]
    async fn test_search_success_with_image() {
        let orch = orchestrator(FakeGateway::new()).await;

        let entry = orch.search("gato", &languages()).await.unwrap();

        assert_eq!(entry.term, "gato");
        assert_eq!(entry.definition, "meaning of gato");
        assert!(entry.image_url.as_deref().unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(entry.native_language, "English");
        assert_eq!(orch.active().await, Some(entry));
    }

    #[tokio::test]
    async fn test_search_succeeds_without_image() {
        let orch = orchestrator(FakeGateway::new().without_image()).await;

        let entry = orch.search("gato", &languages()).await.unwrap();

        assert_eq!(entry.definition, "meaning of gato");
        assert!(entry.image_url.is_none());
    }

    #[tokio::test]
    async fn test_search_fails_when_definition_fails() {
        for gateway in [
            FakeGateway::new().failing_definition(),
            FakeGateway::new().failing_definition().without_image(),
        ] {
            let orch = orchestrator(gateway).await;
            let result = orch.search("gato", &languages()).await;

            assert!(matches!(result, Err(LookupError::Definition(_))));
            assert!(orch.active().await.is_none());
            assert!(orch.collection().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_request() {
        let gateway = FakeGateway::new();
        let calls = gateway.calls();
        let orch = orchestrator(gateway).await;

        let result = orch.search("   \n", &languages()).await;

        assert!(matches!(result, Err(LookupError::EmptyQuery)));
        assert_eq!(calls.definition(), 0);
        assert_eq!(calls.image(), 0);
    }

    #[tokio::test]
    async fn test_definition_and_image_run_concurrently() {
        // Each side waits for the other before answering
        let orch = orchestrator(FakeGateway::new().rendezvous()).await;

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            orch.search("gato", &languages()),
        )
        .await;

        assert!(result.expect("search deadlocked").is_ok());
    }

    #[tokio::test]
    async fn test_newer_search_wins_active_slot() {
        let gateway = FakeGateway::new().with_delay("lento", Duration::from_millis(150));
        let orch = orchestrator(gateway).await;

        let langs = languages();

        let (slow, fast) = tokio::join!(orch.search("lento", &langs), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            orch.search("rápido", &langs).await
        });

        assert!(matches!(slow, Err(LookupError::Superseded)));
        let fast = fast.unwrap();
        assert_eq!(orch.active().await.map(|e| e.id), Some(fast.id));
    }

    #[tokio::test]
    async fn test_save_twice_keeps_collection() {
        let orch = orchestrator(FakeGateway::new()).await;
        let entry = orch.search("gato", &languages()).await.unwrap();

        assert!(orch.save(entry.clone()).await.unwrap());
        let before = orch.collection().await;
        assert!(!orch.save(entry).await.unwrap());
        assert_eq!(orch.collection().await, before);
    }

    #[tokio::test]
    async fn test_update_reaches_active_and_saved() {
        let orch = orchestrator(FakeGateway::new()).await;
        let entry = orch.search("gato", &languages()).await.unwrap();
        orch.save(entry.clone()).await.unwrap();

        let matched = orch
            .update(entry.id, &EntryUpdate::pronunciation("PCM"))
            .await
            .unwrap();

        assert!(matched);
        assert_eq!(
            orch.active().await.unwrap().pronunciation_audio.as_deref(),
            Some("PCM")
        );
        assert_eq!(
            orch.collection().await[0].pronunciation_audio.as_deref(),
            Some("PCM")
        );
    }

    #[tokio::test]
    async fn test_update_active_only() {
        let orch = orchestrator(FakeGateway::new()).await;
        let entry = orch.search("gato", &languages()).await.unwrap();

        assert!(orch.update(entry.id, &EntryUpdate::example_audio(0, "EX")).await.unwrap());
        assert_eq!(
            orch.active().await.unwrap().examples[0].audio.as_deref(),
            Some("EX")
        );
        assert!(orch.collection().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_is_silent_noop() {
        let orch = orchestrator(FakeGateway::new()).await;
        let entry = orch.search("gato", &languages()).await.unwrap();
        orch.save(entry).await.unwrap();
        let collection = orch.collection().await;
        let active = orch.active().await;

        let matched = orch
            .update(EntryId::new_v4(), &EntryUpdate::pronunciation("X"))
            .await
            .unwrap();

        assert!(!matched);
        assert_eq!(orch.collection().await, collection);
        assert_eq!(orch.active().await, active);
    }

    #[tokio::test]
    async fn test_find_prefers_active_then_saved() {
        let orch = orchestrator(FakeGateway::new()).await;
        let saved = orch.search("gato", &languages()).await.unwrap();
        orch.save(saved.clone()).await.unwrap();
        let active = orch.search("perro", &languages()).await.unwrap();

        assert_eq!(orch.find(active.id).await.map(|e| e.term), Some("perro".to_string()));
        assert_eq!(orch.find(saved.id).await.map(|e| e.term), Some("gato".to_string()));
        assert!(orch.find(EntryId::new_v4()).await.is_none());
    }

    /// Accepts `ok_writes` writes, then fails every one after
    struct FlakyStore {
        inner: MemoryStore,
        ok_writes: std::sync::atomic::AtomicUsize,
    }

    impl FlakyStore {
        fn new(ok_writes: usize) -> Self {
            Self {
                inner: MemoryStore::new(),
                ok_writes: std::sync::atomic::AtomicUsize::new(ok_writes),
            }
        }
    }

    #[async_trait::async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let left = self.ok_writes.load(Ordering::SeqCst);
            if left == 0 {
                return Err(std::io::Error::other("disk full").into());
            }
            self.ok_writes.store(left - 1, Ordering::SeqCst);
            self.inner.set(key, value).await
        }
    }

    #[tokio::test]
    async fn test_failed_update_leaves_both_copies_unchanged() {
        let notebook = Notebook::load(Arc::new(FlakyStore::new(1)), "notebook")
            .await
            .unwrap();
        let orch = EntryOrchestrator::new(Arc::new(FakeGateway::new()), notebook);
        let entry = orch.search("gato", &languages()).await.unwrap();
        orch.save(entry.clone()).await.unwrap();

        let result = orch.update(entry.id, &EntryUpdate::pronunciation("PCM")).await;

        assert!(result.is_err());
        assert!(orch.active().await.unwrap().pronunciation_audio.is_none());
        assert!(orch.collection().await[0].pronunciation_audio.is_none());
    }

    #[tokio::test]
    async fn test_save_of_stale_snapshot_keeps_merged_fields() {
        let orch = orchestrator(FakeGateway::new()).await;
        let entry = orch.search("gato", &languages()).await.unwrap();

        let snapshot = orch.active().await.unwrap();
        orch.update(entry.id, &EntryUpdate::pronunciation("PCM")).await.unwrap();
        orch.save(snapshot).await.unwrap();

        assert_eq!(
            orch.collection().await[0].pronunciation_audio.as_deref(),
            Some("PCM")
        );
    }

    #[tokio::test]
    async fn test_save_active() {
        let orch = orchestrator(FakeGateway::new()).await;
        assert_eq!(orch.save_active().await.unwrap(), None);

        let entry = orch.search("gato", &languages()).await.unwrap();

        assert_eq!(
            orch.save_active().await.unwrap(),
            Some(("gato".to_string(), true))
        );
        assert_eq!(
            orch.save_active().await.unwrap(),
            Some(("gato".to_string(), false))
        );
        assert_eq!(orch.collection().await, vec![entry]);
    }

    #[tokio::test]
    async fn test_concurrent_update_and_save_agree() {
        for _ in 0..20 {
            let orch = orchestrator(FakeGateway::new()).await;
            let entry = orch.search("gato", &languages()).await.unwrap();
            let update = EntryUpdate::pronunciation("PCM");

            let (updated, saved) =
                tokio::join!(orch.update(entry.id, &update), orch.save_active());
            updated.unwrap();
            saved.unwrap();

            let active = orch.active().await.unwrap();
            assert_eq!(orch.collection().await, vec![active]);
        }
    }
}
