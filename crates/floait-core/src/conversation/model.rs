//! Conversation domain model.
//!
//! This module contains the core Conversation entity that represents a
//! named, ordered collection of messages in the engine's domain layer.

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to conversations until the first exchange completes.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum number of characters kept when deriving a title from the
/// first user message.
pub const TITLE_MAX_CHARS: usize = 40;

/// Represents a conversation in the engine's domain layer.
///
/// A conversation contains:
/// - A human-readable title (auto-set once from the first user message)
/// - Timestamps for creation and last update
/// - The ordered, append-only message thread
///
/// This is the "pure" domain model that business logic operates on,
/// independent of any specific storage format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier (UUID format)
    pub id: String,
    /// Human-readable conversation title
    pub title: String,
    /// Timestamp when the conversation was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the conversation was last updated; refreshed on
    /// every message append
    pub updated_at: DateTime<Utc>,
    /// Ordered message thread
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Creates a new empty conversation with the default title and
    /// now-timestamps.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        }
    }

    /// Creates a conversation wrapping an existing message thread.
    ///
    /// Used by the startup migration to adopt legacy flat messages.
    pub fn with_messages(messages: Vec<Message>) -> Self {
        let mut conversation = Self::new();
        conversation.messages = messages;
        conversation
    }

    /// Whether the title is still the placeholder (or empty).
    pub fn has_default_title(&self) -> bool {
        self.title.is_empty() || self.title == DEFAULT_TITLE
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
