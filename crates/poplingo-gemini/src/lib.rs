mod client;
pub mod definition;
pub mod markup;
pub mod prompts;
pub mod wire;

pub use client::GeminiClient;

use poplingo_types::{ChatMessage, Definition, DictionaryEntry, LanguagePair};

pub const STORY_FALLBACK: &str = "Could not generate story.";
pub const CHAT_EMPTY_FALLBACK: &str = "I'm not sure how to answer that, but I'm listening! 🎧";
pub const CHAT_ERROR_FALLBACK: &str = "Oops! My brain froze for a sec. 🧊 Try asking again!";

/// Generative AI provider interface.
///
/// Each operation is independent. Only definition generation reports errors;
/// the others absorb provider failures into `None` or a fallback string.
#[async_trait::async_trait]
pub trait AiGateway: Send + Sync {
    /// Structured definition of `term`
    async fn generate_definition(
        &self,
        term: &str,
        languages: &LanguagePair,
    ) -> Result<Definition, GatewayError>;

    /// Illustration as a `data:` URI
    async fn generate_image(&self, term: &str) -> Option<String>;

    /// Base64 PCM (24 kHz, mono, 16-bit LE) for `text` with markup removed
    async fn generate_speech(&self, text: &str) -> Option<String>;

    /// Short story using all `terms`
    async fn generate_story(&self, terms: &[String], languages: &LanguagePair) -> String;

    /// One tutor reply; `history` excludes `message`
    async fn chat(&self, context: &ChatContext, history: &[ChatMessage], message: &str) -> String;
}

/// Entry context re-asserted to the provider on every chat turn
#[derive(Debug, Clone, PartialEq)]
pub struct ChatContext {
    pub term: String,
    pub definition: String,
    pub usage_note: String,
    pub languages: LanguagePair,
}

impl From<&DictionaryEntry> for ChatContext {
    fn from(entry: &DictionaryEntry) -> Self {
        Self {
            term: entry.term.clone(),
            definition: entry.definition.clone(),
            usage_note: entry.usage_note.clone(),
            languages: LanguagePair::new(&entry.native_language, &entry.target_language),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}
