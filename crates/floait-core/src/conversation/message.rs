//! Chat message types.
//!
//! This module contains types for representing messages in a conversation
//! thread, including the sender role and the UI truncation flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the sender of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
    /// Message typed by the user.
    User,
    /// Message produced by the assistant (including synthesized error
    /// bubbles — see the pipeline).
    Assistant,
}

/// A single message in a conversation thread.
///
/// Messages are append-only: after creation only the `expanded` flag
/// may change (long messages are truncated in the UI and can be
/// expanded in place).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format).
    pub id: String,
    /// The text content of the message.
    pub text: String,
    /// Who sent the message.
    pub sender: MessageSender,
    /// Timestamp when the message was created.
    pub time: DateTime<Utc>,
    /// UI truncation state; not meaningful outside the presentation layer.
    #[serde(default)]
    pub expanded: bool,
}

impl Message {
    /// Creates a user message stamped with the current time.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, MessageSender::User)
    }

    /// Creates an assistant message stamped with the current time.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text, MessageSender::Assistant)
    }

    fn new(text: impl Into<String>, sender: MessageSender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            time: Utc::now(),
            expanded: false,
        }
    }
}
