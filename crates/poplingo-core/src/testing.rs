//! Scriptable gateway for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use poplingo_gemini::{AiGateway, ChatContext, GatewayError};
use poplingo_types::{ChatMessage, Definition, ExampleSentence, LanguagePair};
use tokio::sync::Barrier;

/// Base64 of four zero samples
pub const SILENCE: &str = "AAAAAAAAAAA=";

#[derive(Default)]
pub struct Calls {
    definition: AtomicUsize,
    image: AtomicUsize,
    speech: AtomicUsize,
    chat: AtomicUsize,
    speech_texts: Mutex<Vec<String>>,
    chat_history_lens: Mutex<Vec<usize>>,
}

impl Calls {
    pub fn definition(&self) -> usize {
        self.definition.load(Ordering::SeqCst)
    }

    pub fn image(&self) -> usize {
        self.image.load(Ordering::SeqCst)
    }

    pub fn speech(&self) -> usize {
        self.speech.load(Ordering::SeqCst)
    }

    pub fn chat(&self) -> usize {
        self.chat.load(Ordering::SeqCst)
    }

    pub fn speech_texts(&self) -> Vec<String> {
        self.speech_texts.lock().unwrap().clone()
    }

    pub fn chat_history_lens(&self) -> Vec<usize> {
        self.chat_history_lens.lock().unwrap().clone()
    }
}

pub struct FakeGateway {
    definition_fails: bool,
    image: bool,
    speech: Option<String>,
    speech_delay: Option<Duration>,
    delays: HashMap<String, Duration>,
    rendezvous: Option<Arc<Barrier>>,
    calls: Arc<Calls>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            definition_fails: false,
            image: true,
            speech: Some(SILENCE.to_string()),
            speech_delay: None,
            delays: HashMap::new(),
            rendezvous: None,
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn calls(&self) -> Arc<Calls> {
        self.calls.clone()
    }

    pub fn failing_definition(mut self) -> Self {
        self.definition_fails = true;
        self
    }

    pub fn without_image(mut self) -> Self {
        self.image = false;
        self
    }

    pub fn with_speech(mut self, payload: Option<&str>) -> Self {
        self.speech = payload.map(str::to_string);
        self
    }

    pub fn with_speech_delay(mut self, delay: Duration) -> Self {
        self.speech_delay = Some(delay);
        self
    }

    /// Delay the definition of `term`
    pub fn with_delay(mut self, term: &str, delay: Duration) -> Self {
        self.delays.insert(term.to_string(), delay);
        self
    }

    /// Definition and image each block until the other has started
    pub fn rendezvous(mut self) -> Self {
        self.rendezvous = Some(Arc::new(Barrier::new(2)));
        self
    }
}

#[async_trait]
impl AiGateway for FakeGateway {
    async fn generate_definition(
        &self,
        term: &str,
        _languages: &LanguagePair,
    ) -> Result<Definition, GatewayError> {
        self.calls.definition.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.rendezvous {
            barrier.wait().await;
        }
        if let Some(delay) = self.delays.get(term) {
            tokio::time::sleep(*delay).await;
        }
        if self.definition_fails {
            return Err(GatewayError::EmptyResponse);
        }

        Ok(Definition {
            definition: format!("meaning of {term}"),
            phonetic: Some("/test/".to_string()),
            examples: vec![
                ExampleSentence::new(format!("Un <b>{term}</b> aquí."), format!("A {term} here.")),
                ExampleSentence::new(format!("Dos <b>{term}s</b>."), format!("Two {term}s.")),
            ],
            usage_note: "Use it often.".to_string(),
        })
    }

    async fn generate_image(&self, _term: &str) -> Option<String> {
        self.calls.image.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.rendezvous {
            barrier.wait().await;
        }
        self.image
            .then(|| "data:image/png;base64,iVBORw0KGgo=".to_string())
    }

    async fn generate_speech(&self, text: &str) -> Option<String> {
        self.calls.speech.fetch_add(1, Ordering::SeqCst);
        self.calls.speech_texts.lock().unwrap().push(text.to_string());
        if let Some(delay) = self.speech_delay {
            tokio::time::sleep(delay).await;
        }
        self.speech.clone()
    }

    async fn generate_story(&self, terms: &[String], _languages: &LanguagePair) -> String {
        format!("A story about {}", terms.join(", "))
    }

    async fn chat(&self, context: &ChatContext, history: &[ChatMessage], message: &str) -> String {
        self.calls.chat.fetch_add(1, Ordering::SeqCst);
        self.calls.chat_history_lens.lock().unwrap().push(history.len());
        format!("{}: {}", context.term, message)
    }
}
