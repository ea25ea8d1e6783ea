use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entry::{DictionaryEntry, EntryId, LanguagePair};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // UI -> app
    Search(String),
    SaveActive,
    Delete(EntryId),
    PlayAudio(AudioTarget),
    SendChat(String),
    GenerateStory,
    SetLanguages { native: String, target: String },
    SwapLanguages,
    StartStudy,
    Study(StudyCommand),
    Quit,

    // App -> UI
    BackendReady,
    SearchStarted(String),
    ShowEntry { entry: DictionaryEntry, saved: bool },
    SearchFailed(String),
    NotebookChanged(Vec<DictionaryEntry>),
    ChatReply(ChatMessage),
    ShowStory(String),
    ShowCard(Option<StudyCard>),
    LanguagesChanged(LanguagePair),
    Status(String),
}

/// What a play request points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioTarget {
    Term(EntryId),
    Example { entry: EntryId, index: usize },
}

impl AudioTarget {
    pub fn entry_id(&self) -> EntryId {
        match self {
            AudioTarget::Term(id) => *id,
            AudioTarget::Example { entry, .. } => *entry,
        }
    }

    /// Key used to guard re-entry while a fetch is pending
    pub fn trigger_key(&self) -> String {
        match self {
            AudioTarget::Term(id) => format!("term:{id}"),
            AudioTarget::Example { entry, index } => format!("example:{entry}:{index}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One tutor turn. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyCommand {
    Next,
    Previous,
    Flip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashcardSide {
    #[default]
    Front,
    Back,
}

/// Flashcard view of one notebook entry
#[derive(Debug, Clone, PartialEq)]
pub struct StudyCard {
    pub entry: DictionaryEntry,
    pub side: FlashcardSide,
    pub position: usize,
    pub total: usize,
}
