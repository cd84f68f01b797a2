//! Conversation message types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// An image attached to an outgoing chat message.
///
/// Only referenced locally for display; it is never uploaded with the chat
/// turn and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatImage {
    pub path: PathBuf,
}

impl ChatImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A display reference for the image, analogous to a local object URL.
    pub fn reference(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// A single entry of a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    /// Message body; may be empty when the user only sent an image.
    pub text: String,
    /// Transient local image reference.
    pub image: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, image: Option<&ChatImage>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            image: image.map(ChatImage::reference),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            image: None,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
