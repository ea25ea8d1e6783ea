use std::env;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_chat_history_limit() -> usize {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GeminiConfig {
    /// Left empty in profiles; filled from the environment
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_speech_model")]
    pub speech_model: String,
    /// Prebuilt voice for speech synthesis
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Most recent chat turns replayed to the provider
    #[serde(default = "default_chat_history_limit")]
    pub chat_history_limit: usize,
}

impl GeminiConfig {
    pub fn new() -> Self {
        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| default_api_url());

        let timeout_seconds = env::var("GEMINI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_timeout_seconds());

        Self {
            api_key: api_key_from_env().unwrap_or_default(),
            api_url,
            timeout_seconds,
            ..Default::default()
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            speech_model: default_speech_model(),
            voice: default_voice(),
            timeout_seconds: default_timeout_seconds(),
            chat_history_limit: default_chat_history_limit(),
        }
    }
}

/// `GEMINI_API_KEY`, then `API_KEY`
pub fn api_key_from_env() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|v| !v.trim().is_empty())
}
