//! JSON-backed ConversationRepository implementation.
//!
//! Persists the full conversation set under one storage key and reads
//! the legacy flat message list for the one-time startup migration.

use crate::dto::{ConversationDto, MessageDto};
use crate::json_storage::{JsonStorage, keys};
use async_trait::async_trait;
use floait_core::conversation::{Conversation, ConversationRepository, Message};
use floait_core::error::Result;

/// Conversation repository over [`JsonStorage`].
pub struct JsonConversationRepository {
    storage: JsonStorage,
}

impl JsonConversationRepository {
    pub fn new(storage: JsonStorage) -> Self {
        Self { storage }
    }

    /// Creates a repository at the default storage location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(JsonStorage::default_location()?))
    }
}

#[async_trait]
impl ConversationRepository for JsonConversationRepository {
    async fn load_all(&self) -> Result<Vec<Conversation>> {
        let dtos: Vec<ConversationDto> = self
            .storage
            .load(keys::CONVERSATIONS)
            .await?
            .unwrap_or_default();
        Ok(dtos.into_iter().map(Conversation::from).collect())
    }

    async fn save_all(&self, conversations: &[Conversation]) -> Result<()> {
        let dtos: Vec<ConversationDto> =
            conversations.iter().map(ConversationDto::from).collect();
        self.storage.save(keys::CONVERSATIONS, &dtos).await
    }

    async fn clear(&self) -> Result<()> {
        self.storage.remove(keys::CONVERSATIONS).await?;
        self.storage.remove(keys::LEGACY_MESSAGES).await
    }

    async fn load_legacy_messages(&self) -> Result<Vec<Message>> {
        let dtos: Vec<MessageDto> = self
            .storage
            .load(keys::LEGACY_MESSAGES)
            .await?
            .unwrap_or_default();
        Ok(dtos.into_iter().map(Message::from).collect())
    }

    async fn clear_legacy_messages(&self) -> Result<()> {
        self.storage.remove(keys::LEGACY_MESSAGES).await
    }
}
