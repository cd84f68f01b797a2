//! Conversation record.

use super::message::ChatMessage;
use uuid::Uuid;

/// Generates an opaque random identifier for sessions and knowledge entries.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// An ongoing conversation with the chatbot.
///
/// The identifier correlates every chat turn and the ticket draft request
/// with the backend's per-conversation memory. Sessions live only in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    messages: Vec<ChatMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: new_record_id(),
            messages: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Appends a message. The log is append-only.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Whether the escalation action is offered: only when the most recent
    /// message came from the bot.
    pub fn can_escalate(&self) -> bool {
        self.last().is_some_and(ChatMessage::is_bot)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
