use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EntryId = Uuid;

/// A saved or in-progress lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub id: EntryId,
    pub term: String,
    pub definition: String,
    /// Display name, captured at creation time
    pub native_language: String,
    /// Display name, captured at creation time
    pub target_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// `data:` URI of the generated illustration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub examples: Vec<ExampleSentence>,
    pub usage_note: String,
    /// Base64 PCM payload, filled in lazily
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_audio: Option<String>,
    /// Creation instant in unix milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSentence {
    /// Target-language sentence with the term wrapped in highlight markers
    pub original: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl ExampleSentence {
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translation: translation.into(),
            audio: None,
        }
    }
}

/// Structured output of definition generation
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub definition: String,
    pub phonetic: Option<String>,
    pub examples: Vec<ExampleSentence>,
    pub usage_note: String,
}

/// Native/target language display names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub native: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(native: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            native: native.into(),
            target: target.into(),
        }
    }
}

impl DictionaryEntry {
    /// Materialize an entry from a finished lookup.
    ///
    /// A fresh id and creation timestamp are assigned here and nowhere else.
    pub fn compose(
        term: impl Into<String>,
        languages: &LanguagePair,
        definition: Definition,
        image_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            term: term.into(),
            definition: definition.definition,
            native_language: languages.native.clone(),
            target_language: languages.target.clone(),
            phonetic: definition.phonetic,
            image_url,
            examples: definition.examples,
            usage_note: definition.usage_note,
            pronunciation_audio: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Merge a partial update into the derived/cached fields.
    ///
    /// Identity fields (`id`, `term`, language pair) are never touched.
    pub fn apply(&mut self, update: &EntryUpdate) {
        if let Some(audio) = &update.pronunciation_audio {
            self.pronunciation_audio = Some(audio.clone());
        }
        if let Some(examples) = &update.examples {
            self.examples = examples.clone();
        }
        if let Some((index, audio)) = &update.example_audio {
            if let Some(example) = self.examples.get_mut(*index) {
                example.audio = Some(audio.clone());
            }
        }
    }
}

/// Partial set of field changes for an entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub pronunciation_audio: Option<String>,
    /// Replaces the whole example list
    pub examples: Option<Vec<ExampleSentence>>,
    /// Caches audio for one example, applied after `examples`
    pub example_audio: Option<(usize, String)>,
}

impl EntryUpdate {
    pub fn pronunciation(audio: impl Into<String>) -> Self {
        Self {
            pronunciation_audio: Some(audio.into()),
            ..Default::default()
        }
    }

    pub fn example_audio(index: usize, audio: impl Into<String>) -> Self {
        Self {
            example_audio: Some((index, audio.into())),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pronunciation_audio.is_none() && self.examples.is_none() && self.example_audio.is_none()
    }
}
