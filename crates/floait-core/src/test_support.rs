//! In-memory repository implementations shared by the store, pipeline
//! and undo tests.

use crate::conversation::{Conversation, ConversationRepository, Message};
use crate::error::Result;
use crate::state::{StateRepository, Theme};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryConversationRepository {
    pub conversations: Mutex<Vec<Conversation>>,
    pub legacy_messages: Mutex<Vec<Message>>,
}

#[async_trait::async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn load_all(&self) -> Result<Vec<Conversation>> {
        Ok(self.conversations.lock().unwrap().clone())
    }

    async fn save_all(&self, conversations: &[Conversation]) -> Result<()> {
        *self.conversations.lock().unwrap() = conversations.to_vec();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.conversations.lock().unwrap().clear();
        self.legacy_messages.lock().unwrap().clear();
        Ok(())
    }

    async fn load_legacy_messages(&self) -> Result<Vec<Message>> {
        Ok(self.legacy_messages.lock().unwrap().clone())
    }

    async fn clear_legacy_messages(&self) -> Result<()> {
        self.legacy_messages.lock().unwrap().clear();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryStateRepository {
    pub active: Mutex<Option<String>>,
    pub dark_mode: Mutex<bool>,
}

#[async_trait::async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn get_active_conversation(&self) -> Option<String> {
        self.active.lock().unwrap().clone()
    }

    async fn set_active_conversation(&self, conversation_id: String) -> Result<()> {
        *self.active.lock().unwrap() = Some(conversation_id);
        Ok(())
    }

    async fn clear_active_conversation(&self) -> Result<()> {
        *self.active.lock().unwrap() = None;
        Ok(())
    }

    async fn get_theme(&self) -> Theme {
        Theme::from_dark_flag(*self.dark_mode.lock().unwrap())
    }

    async fn set_theme(&self, theme: Theme) -> Result<()> {
        *self.dark_mode.lock().unwrap() = theme.is_dark();
        Ok(())
    }
}
