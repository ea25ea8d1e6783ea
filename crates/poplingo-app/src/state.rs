use std::sync::Arc;

use poplingo_config::Config;
use poplingo_core::{
    ChatSession, EntryOrchestrator, FileStore, Notebook, PlaybackController, StorageError,
    StudyDeck,
};
use poplingo_gemini::{AiGateway, GeminiClient};
use tokio::sync::{Mutex, RwLock};

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub orchestrator: EntryOrchestrator,
    pub playback: PlaybackController,
    /// Tutor session for the active search result
    pub chat: Mutex<Option<ChatSession>>,
    pub study: Mutex<StudyDeck>,
}

impl AppState {
    /// Open the on-disk notebook and connect to Gemini
    pub async fn init(config: Config) -> Result<Self, StorageError> {
        let store = Arc::new(FileStore::new(config.storage.data_dir.clone()));
        let notebook = Notebook::load(store, config.storage.collection_key.clone()).await?;

        let gateway: Arc<dyn AiGateway> = Arc::new(GeminiClient::new(config.gemini.clone()));
        let playback = PlaybackController::with_default_output(gateway.clone());

        Ok(Self::new(config, gateway, notebook, playback))
    }

    pub fn new(
        config: Config,
        gateway: Arc<dyn AiGateway>,
        notebook: Notebook,
        playback: PlaybackController,
    ) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            orchestrator: EntryOrchestrator::new(gateway, notebook),
            playback,
            chat: Mutex::new(None),
            study: Mutex::new(StudyDeck::default()),
        }
    }
}
