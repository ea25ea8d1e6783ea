pub mod chat;
pub mod error;
pub mod notebook;
pub mod orchestrator;
pub mod playback;
pub mod preprocess;
pub mod storage;
pub mod study;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{ChatSession, PendingTurn};
pub use error::{LookupError, StorageError};
pub use notebook::Notebook;
pub use orchestrator::EntryOrchestrator;
pub use playback::PlaybackController;
pub use preprocess::{Preprocessor, QueryPreprocessor};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use study::StudyDeck;
