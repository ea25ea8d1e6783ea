use poplingo_gemini::{AiGateway, ChatContext};
use poplingo_types::{ChatMessage, DictionaryEntry, EntryId};

/// Tutor conversation about one entry. Lives only in memory.
#[derive(Debug, Clone)]
pub struct ChatSession {
    entry_id: EntryId,
    context: ChatContext,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(entry: &DictionaryEntry) -> Self {
        Self {
            entry_id: entry.id,
            context: ChatContext::from(entry),
            messages: Vec::new(),
        }
    }

    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    pub fn term(&self) -> &str {
        &self.context.term
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send one user turn and record the reply.
    ///
    /// Blank input is ignored. The gateway sees the history before this turn.
    pub async fn send(&mut self, gateway: &dyn AiGateway, text: &str) -> Option<ChatMessage> {
        let turn = self.begin(text)?;
        let reply = turn.ask(gateway).await;
        self.finish(turn, reply)
    }

    /// Snapshot what the gateway needs for one turn, so the reply can be
    /// awaited without holding the session.
    pub fn begin(&self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(PendingTurn {
            entry_id: self.entry_id,
            context: self.context.clone(),
            history: self.messages.clone(),
            text: text.to_string(),
        })
    }

    /// Record a finished turn. A turn begun on another entry's session is dropped.
    pub fn finish(&mut self, turn: PendingTurn, reply: String) -> Option<ChatMessage> {
        if turn.entry_id != self.entry_id {
            return None;
        }

        self.messages.push(ChatMessage::user(turn.text));
        let reply = ChatMessage::model(reply);
        self.messages.push(reply.clone());

        Some(reply)
    }
}

/// One user turn in flight
#[derive(Debug, Clone)]
pub struct PendingTurn {
    entry_id: EntryId,
    context: ChatContext,
    history: Vec<ChatMessage>,
    text: String,
}

impl PendingTurn {
    pub async fn ask(&self, gateway: &dyn AiGateway) -> String {
        gateway.chat(&self.context, &self.history, &self.text).await
    }
}
