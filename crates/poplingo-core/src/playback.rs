use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use poplingo_audio::{AudioError, AudioSink, decode_base64_pcm, open_default_output};
use poplingo_gemini::AiGateway;
use tokio::sync::OnceCell;

type OutputFactory = Box<dyn Fn() -> Result<Arc<dyn AudioSink>, AudioError> + Send + Sync>;

/// Fetches, decodes and plays pronunciation audio.
///
/// The output is opened on first use and reused for the rest of the session.
/// A trigger that is still fetching cannot be started again; different
/// triggers may play over each other.
pub struct PlaybackController {
    gateway: Arc<dyn AiGateway>,
    output: OnceCell<Arc<dyn AudioSink>>,
    open_output: OutputFactory,
    pending: Mutex<HashSet<String>>,
}

impl PlaybackController {
    pub fn new<F>(gateway: Arc<dyn AiGateway>, open_output: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn AudioSink>, AudioError> + Send + Sync + 'static,
    {
        Self {
            gateway,
            output: OnceCell::new(),
            open_output: Box::new(open_output),
            pending: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_default_output(gateway: Arc<dyn AiGateway>) -> Self {
        Self::new(gateway, open_default_output)
    }

    pub fn is_pending(&self, trigger: &str) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(trigger)
    }

    /// Play `text`, from `cached` when given.
    ///
    /// Returns a freshly synthesized payload so the caller can cache it.
    /// Every failure is logged and swallowed.
    pub async fn play(&self, trigger: &str, text: &str, cached: Option<&str>) -> Option<String> {
        if let Some(payload) = cached {
            tracing::debug!("[AUDIO] Replaying cached clip for {}", trigger);
            self.decode_and_play(payload).await;
            return None;
        }

        let Some(_guard) = PendingGuard::acquire(&self.pending, trigger) else {
            tracing::debug!("[AUDIO] {} already fetching, ignoring", trigger);
            return None;
        };

        let payload = self.gateway.generate_speech(text).await?;
        self.decode_and_play(&payload).await;

        Some(payload)
    }

    async fn decode_and_play(&self, payload: &str) {
        let buffer = match decode_base64_pcm(payload) {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::warn!("[AUDIO] Could not decode speech payload: {}", e);
                return;
            }
        };

        let output = match self
            .output
            .get_or_try_init(|| async { (self.open_output)() })
            .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("[AUDIO] Failed to open output: {}", e);
                return;
            }
        };

        if let Err(e) = output.play(buffer) {
            tracing::error!("[AUDIO] Playback failed: {}", e);
        }
    }
}

/// Holds a trigger in the pending set until dropped
struct PendingGuard<'a> {
    pending: &'a Mutex<HashSet<String>>,
    trigger: String,
}

impl<'a> PendingGuard<'a> {
    fn acquire(pending: &'a Mutex<HashSet<String>>, trigger: &str) -> Option<Self> {
        let inserted = pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(trigger.to_string());

        inserted.then(|| Self {
            pending,
            trigger: trigger.to_string(),
        })
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.trigger);
    }
}
