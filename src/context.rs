//! Conversation context: the rolling chat history sent to the model on each turn.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of the conversation, in Ollama's chat wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only history shared by all message handlers.
///
/// Grows without bound for the lifetime of the process and is lost on
/// restart. The lock is only held for a synchronous push or clone, never
/// across an await, so overlapping handlers interleave at message
/// granularity.
#[derive(Clone, Default)]
pub struct ConversationHistory {
    inner: Arc<Mutex<Vec<ChatMessage>>>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message in insertion order.
    pub fn push(&self, message: ChatMessage) {
        self.inner.lock().unwrap().push(message);
    }

    /// Clone of the full history, oldest first.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.inner.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
