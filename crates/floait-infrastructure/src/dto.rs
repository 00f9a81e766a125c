//! Storage DTOs.
//!
//! The on-disk schema keeps the camelCase field names the original
//! widget wrote to browser storage, so payloads produced by earlier
//! deployments load cleanly. Decoding is deliberately lenient where the
//! legacy writer was sloppy: message ids may be numbers, and the sender
//! field historically held the assistant's display name rather than a
//! role.

use chrono::{DateTime, Utc};
use floait_core::conversation::{Conversation, Message, MessageSender};
use serde::{Deserialize, Deserializer, Serialize};

/// Stored form of a [`Message`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    pub text: String,
    #[serde(deserialize_with = "lenient_sender")]
    pub sender: MessageSender,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub expanded: bool,
}

/// Stored form of a [`Conversation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDto {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
}

// Legacy payloads used `Date.now()` numbers as message ids.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Number(i64),
    }
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(id) => id,
        IdRepr::Number(id) => id.to_string(),
    })
}

// Anything that is not literally "user" was written by the assistant
// (the legacy writer stored the widget's display name there).
fn lenient_sender<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MessageSender, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(if raw == "user" {
        MessageSender::User
    } else {
        MessageSender::Assistant
    })
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.clone(),
            text: message.text.clone(),
            sender: message.sender,
            time: message.time,
            expanded: message.expanded,
        }
    }
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        Self {
            id: dto.id,
            text: dto.text,
            sender: dto.sender,
            time: dto.time,
            expanded: dto.expanded,
        }
    }
}

impl From<&Conversation> for ConversationDto {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.clone(),
            title: conversation.title.clone(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
            messages: conversation.messages.iter().map(MessageDto::from).collect(),
        }
    }
}

impl From<ConversationDto> for Conversation {
    fn from(dto: ConversationDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            messages: dto.messages.into_iter().map(Message::from).collect(),
        }
    }
}
