pub mod entry;
pub mod types;

pub use entry::{
    Definition, DictionaryEntry, EntryId, EntryUpdate, ExampleSentence, LanguagePair,
};
pub use types::{
    AppEvent, AudioTarget, ChatMessage, ChatRole, FlashcardSide, StudyCard, StudyCommand,
};
