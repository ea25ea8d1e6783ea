use std::time::Duration;

use async_trait::async_trait;
use poplingo_config::gemini::GeminiConfig;
use poplingo_types::{ChatMessage, Definition, LanguagePair};

use crate::definition::{parse_definition, unhighlighted_examples};
use crate::prompts;
use crate::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::{
    AiGateway, CHAT_EMPTY_FALLBACK, CHAT_ERROR_FALLBACK, ChatContext, GatewayError, STORY_FALLBACK,
};

const DEFAULT_IMAGE_MIME: &str = "image/png";

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("HTTP client setup failed, using defaults: {}", e);
                reqwest::Client::new()
            });

        Self { client, config }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Call `generateContent` on `model`
    async fn invoke(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GatewayError> {
        if !self.config.has_api_key() {
            return Err(GatewayError::AuthenticationError);
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(GatewayError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(GatewayError::AuthenticationError);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::ApiError(format!("HTTP {status}: {body}")));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn try_definition(
        &self,
        term: &str,
        languages: &LanguagePair,
    ) -> Result<Definition, GatewayError> {
        let request = prompts::definition_request(term, languages);
        let response = self.invoke(&self.config.text_model, &request).await?;
        let text = response.text().ok_or(GatewayError::EmptyResponse)?;

        let definition = parse_definition(&text)?;

        let missing = unhighlighted_examples(&definition);
        if !missing.is_empty() {
            tracing::warn!(
                "Definition for '{}' has examples without a single highlight: {:?}",
                term,
                missing
            );
        }

        Ok(definition)
    }

    pub async fn try_image(&self, term: &str) -> Result<Option<String>, GatewayError> {
        let request = prompts::image_request(term);
        let response = self.invoke(&self.config.image_model, &request).await?;

        Ok(response.inline_data().map(|data| {
            let mime = data.mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME);
            format!("data:{};base64,{}", mime, data.data)
        }))
    }

    pub async fn try_speech(&self, text: &str) -> Result<Option<String>, GatewayError> {
        let request = prompts::speech_request(text, &self.config.voice);
        let response = self.invoke(&self.config.speech_model, &request).await?;

        Ok(response.inline_data().map(|data| data.data.clone()))
    }

    pub async fn try_story(
        &self,
        terms: &[String],
        languages: &LanguagePair,
    ) -> Result<Option<String>, GatewayError> {
        let request = prompts::story_request(terms, languages);
        let response = self.invoke(&self.config.text_model, &request).await?;

        Ok(response.text())
    }

    pub async fn try_chat(
        &self,
        context: &ChatContext,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<Option<String>, GatewayError> {
        let request =
            prompts::chat_request(context, history, message, self.config.chat_history_limit);
        let response = self.invoke(&self.config.text_model, &request).await?;

        Ok(response.text())
    }
}

#[async_trait]
impl AiGateway for GeminiClient {
    async fn generate_definition(
        &self,
        term: &str,
        languages: &LanguagePair,
    ) -> Result<Definition, GatewayError> {
        self.try_definition(term, languages).await
    }

    async fn generate_image(&self, term: &str) -> Option<String> {
        match self.try_image(term).await {
            Ok(image) => {
                if image.is_none() {
                    tracing::warn!("Image generation for '{}' returned no image", term);
                }
                image
            }
            Err(e) => {
                tracing::warn!("Image generation failed: {}", e);
                None
            }
        }
    }

    async fn generate_speech(&self, text: &str) -> Option<String> {
        match self.try_speech(text).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::error!("Speech generation failed: {}", e);
                None
            }
        }
    }

    async fn generate_story(&self, terms: &[String], languages: &LanguagePair) -> String {
        match self.try_story(terms, languages).await {
            Ok(Some(story)) => story,
            Ok(None) => STORY_FALLBACK.to_string(),
            Err(e) => {
                tracing::error!("Story generation failed: {}", e);
                STORY_FALLBACK.to_string()
            }
        }
    }

    async fn chat(&self, context: &ChatContext, history: &[ChatMessage], message: &str) -> String {
        match self.try_chat(context, history, message).await {
            Ok(Some(reply)) => reply,
            Ok(None) => CHAT_EMPTY_FALLBACK.to_string(),
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                CHAT_ERROR_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nothing listens on the discard port, so every request fails fast
    fn unreachable_client() -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string(),
            api_url: "http://127.0.0.1:9/v1beta".to_string(),
            timeout_seconds: 5,
            ..Default::default()
        })
    }

    fn languages() -> LanguagePair {
        LanguagePair::new("English", "Spanish")
    }

    #[tokio::test]
    async fn test_definition_failure_is_hard_error() {
        let client = unreachable_client();
        let result = client.generate_definition("gato", &languages()).await;
        assert!(matches!(result, Err(GatewayError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let client = GeminiClient::new(GeminiConfig::default());
        let result = client.generate_definition("gato", &languages()).await;
        assert!(matches!(result, Err(GatewayError::AuthenticationError)));
        assert!(client.generate_image("gato").await.is_none());
    }

    #[tokio::test]
    async fn test_soft_operations_absorb_failure() {
        let client = unreachable_client();

        assert!(client.generate_image("gato").await.is_none());
        assert!(client.generate_speech("Un <b>gato</b>.").await.is_none());

        let story = client
            .generate_story(&["gato".to_string()], &languages())
            .await;
        assert_eq!(story, STORY_FALLBACK);

        let context = ChatContext {
            term: "gato".to_string(),
            definition: "cat".to_string(),
            usage_note: String::new(),
            languages: languages(),
        };
        let reply = client.chat(&context, &[], "why?").await;
        assert_eq!(reply, CHAT_ERROR_FALLBACK);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string(),
            api_url: format!("http://{addr}/v1beta"),
            timeout_seconds: 1,
            ..Default::default()
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            client.generate_definition("gato", &languages()),
        )
        .await
        .expect("request outlived its timeout");
        assert!(matches!(result, Err(GatewayError::NetworkError(_))));
    }
}
