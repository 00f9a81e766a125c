//! Conversation store.
//!
//! `ConversationStore` is the single source of truth for all conversation
//! state. The displayed thread is always derived from the active
//! conversation (`active_messages`), never mirrored in a second field, so
//! the thread and the conversation cannot diverge.
//!
//! Every mutation writes through to the repositories before returning;
//! durability is synchronous from the caller's perspective.

use super::message::Message;
use super::model::{Conversation, DEFAULT_TITLE, TITLE_MAX_CHARS};
use super::repository::ConversationRepository;
use crate::error::Result;
use crate::state::StateRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A full copy of conversation state captured for reversible deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub conversations: Vec<Conversation>,
    pub active_conversation_id: Option<String>,
}

/// Manages all conversations and the active-conversation pointer.
///
/// `ConversationStore` is responsible for:
/// - Creating new conversations (explicitly or on demand)
/// - Appending messages and refreshing `updated_at`
/// - Title management (auto-title and rename)
/// - Switching the active conversation
/// - Bulk deletion and snapshot/restore for undo
/// - Startup reconciliation (legacy migration, active-pointer recovery)
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
    conversation_repository: Arc<dyn ConversationRepository>,
    state_repository: Arc<dyn StateRepository>,
}

impl ConversationStore {
    /// Loads the store from the repository backends and reconciles state.
    ///
    /// Reconciliation runs exactly once per session, here:
    /// 1. Legacy flat messages present and zero conversations: wrap them
    ///    into one new conversation and activate it (one-time migration).
    /// 2. Conversations present but no valid active pointer: activate the
    ///    one with the greatest `updated_at`.
    pub async fn load(
        conversation_repository: Arc<dyn ConversationRepository>,
        state_repository: Arc<dyn StateRepository>,
    ) -> Result<Self> {
        let conversations = conversation_repository.load_all().await?;
        let active_id = state_repository.get_active_conversation().await;

        let mut store = Self {
            conversations,
            active_id,
            conversation_repository,
            state_repository,
        };
        store.reconcile().await?;
        Ok(store)
    }

    async fn reconcile(&mut self) -> Result<()> {
        if self.conversations.is_empty() {
            let legacy = self.conversation_repository.load_legacy_messages().await?;
            if !legacy.is_empty() {
                info!(count = legacy.len(), "migrating legacy messages into a conversation");
                let conversation = Conversation::with_messages(legacy);
                let id = conversation.id.clone();
                self.conversations.push(conversation);
                self.persist_conversations().await?;
                self.conversation_repository.clear_legacy_messages().await?;
                self.set_active(Some(id)).await?;
            } else if self.active_id.is_some() {
                // Pointer into an empty set is stale.
                self.set_active(None).await?;
            }
            return Ok(());
        }

        let pointer_valid = self
            .active_id
            .as_ref()
            .is_some_and(|id| self.conversations.iter().any(|c| &c.id == id));
        if !pointer_valid {
            let most_recent = self
                .conversations
                .iter()
                .max_by_key(|c| c.updated_at)
                .map(|c| c.id.clone());
            debug!(?most_recent, "no valid active pointer, activating most recent");
            self.set_active(most_recent).await?;
        }
        Ok(())
    }

    /// Returns the active conversation id, creating and activating a new
    /// conversation when none is active.
    ///
    /// Idempotent once a conversation is active: repeated calls return the
    /// same id without creating a second conversation.
    pub async fn ensure_active(&mut self) -> Result<String> {
        if let Some(id) = &self.active_id
            && self.conversations.iter().any(|c| &c.id == id)
        {
            return Ok(id.clone());
        }
        self.create_new().await
    }

    /// Always creates a fresh empty conversation, inserts it as the most
    /// recent, sets it active, and returns its id.
    pub async fn create_new(&mut self) -> Result<String> {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.persist_conversations().await?;
        self.set_active(Some(id.clone())).await?;
        Ok(id)
    }

    /// Appends a message to the named conversation and refreshes its
    /// `updated_at`.
    ///
    /// A no-op when the conversation does not exist; this is a defensive
    /// guard, not a user-visible error.
    pub async fn append_message(&mut self, conversation_id: &str, message: Message) -> Result<()> {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            warn!(conversation_id, "append_message on unknown conversation, ignoring");
            return Ok(());
        };
        conversation.messages.push(message);
        conversation.updated_at = Utc::now();
        self.persist_conversations().await
    }

    /// Sets the title only while the current title is empty or still the
    /// default placeholder. Empty candidates are ignored. The stored title
    /// is truncated to [`TITLE_MAX_CHARS`] characters.
    pub async fn set_title_if_default(
        &mut self,
        conversation_id: &str,
        candidate: &str,
    ) -> Result<()> {
        if candidate.is_empty() {
            return Ok(());
        }
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            warn!(conversation_id, "set_title_if_default on unknown conversation, ignoring");
            return Ok(());
        };
        if !conversation.has_default_title() {
            return Ok(());
        }
        conversation.title = candidate.chars().take(TITLE_MAX_CHARS).collect();
        self.persist_conversations().await
    }

    /// Unconditionally renames a conversation. Empty input resets the
    /// title to the default placeholder; an empty title is never stored.
    pub async fn rename(&mut self, conversation_id: &str, new_title: &str) -> Result<()> {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            warn!(conversation_id, "rename on unknown conversation, ignoring");
            return Ok(());
        };
        let trimmed = new_title.trim();
        conversation.title = if trimmed.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            trimmed.chars().take(TITLE_MAX_CHARS).collect()
        };
        self.persist_conversations().await
    }

    /// Switches the active pointer and returns that conversation's
    /// messages. Returns an empty thread (and leaves the pointer
    /// untouched) when the conversation does not exist.
    pub async fn select(&mut self, conversation_id: &str) -> Result<Vec<Message>> {
        let Some(messages) = self
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .map(|c| c.messages.clone())
        else {
            warn!(conversation_id, "select on unknown conversation, ignoring");
            return Ok(Vec::new());
        };
        self.set_active(Some(conversation_id.to_string())).await?;
        Ok(messages)
    }

    /// Clears all conversations, the active pointer, and the persisted
    /// keys backing them.
    pub async fn delete_all(&mut self) -> Result<()> {
        self.conversations.clear();
        self.conversation_repository.clear().await?;
        self.set_active(None).await
    }

    /// Toggles the `expanded` flag on a message in the active conversation.
    pub async fn toggle_expanded(&mut self, message_id: &str) -> Result<()> {
        let Some(active_id) = self.active_id.clone() else {
            return Ok(());
        };
        let Some(message) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == active_id)
            .and_then(|c| c.messages.iter_mut().find(|m| m.id == message_id))
        else {
            warn!(message_id, "toggle_expanded on unknown message, ignoring");
            return Ok(());
        };
        message.expanded = !message.expanded;
        self.persist_conversations().await
    }

    /// Captures a full snapshot of the current state for reversible
    /// deletion.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            conversations: self.conversations.clone(),
            active_conversation_id: self.active_id.clone(),
        }
    }

    /// Restores state from a snapshot verbatim and re-persists it.
    pub async fn restore(&mut self, snapshot: StateSnapshot) -> Result<()> {
        self.conversations = snapshot.conversations;
        self.persist_conversations().await?;
        self.set_active(snapshot.active_conversation_id).await
    }

    /// The id of the active conversation, if any.
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The displayed thread: the active conversation's messages, derived
    /// on demand. Empty when no conversation is active.
    pub fn active_messages(&self) -> &[Message] {
        self.active_id
            .as_ref()
            .and_then(|id| self.conversations.iter().find(|c| &c.id == id))
            .map(|c| c.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Looks up a conversation by id.
    pub fn get(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == conversation_id)
    }

    /// All conversations in insertion order (front = most recently
    /// inserted).
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Conversations sorted by `updated_at` descending, the order the
    /// sidebar presents them in.
    pub fn sorted_by_recency(&self) -> Vec<&Conversation> {
        let mut sorted: Vec<&Conversation> = self.conversations.iter().collect();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sorted
    }

    async fn persist_conversations(&self) -> Result<()> {
        self.conversation_repository
            .save_all(&self.conversations)
            .await
    }

    async fn set_active(&mut self, id: Option<String>) -> Result<()> {
        match &id {
            Some(id) => {
                self.state_repository
                    .set_active_conversation(id.clone())
                    .await?
            }
            None => self.state_repository.clear_active_conversation().await?,
        }
        self.active_id = id;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
