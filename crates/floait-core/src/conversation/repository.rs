//! Conversation repository trait.
//!
//! Defines the interface for conversation persistence operations.

use super::message::Message;
use super::model::Conversation;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for managing conversation persistence.
///
/// This trait defines the contract for persisting and retrieving the full
/// conversation set, decoupling the engine's core logic from the specific
/// storage mechanism (e.g., JSON files, browser storage, remote API).
///
/// # Implementation Notes
///
/// Implementations must treat malformed or corrupt stored payloads as
/// absent data rather than failing — storage corruption never crashes
/// the application.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Loads all stored conversations.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Conversation>)`: All stored conversations (empty when
    ///   nothing is stored or the payload is unreadable)
    /// - `Err(_)`: Error occurred during retrieval
    async fn load_all(&self) -> Result<Vec<Conversation>>;

    /// Saves the full conversation set to storage.
    async fn save_all(&self, conversations: &[Conversation]) -> Result<()>;

    /// Removes all stored conversations (including the legacy flat
    /// message list).
    async fn clear(&self) -> Result<()>;

    /// Loads the legacy flat message list, if present.
    ///
    /// Older deployments persisted a single unowned message thread; the
    /// startup migration wraps it into a conversation exactly once.
    async fn load_legacy_messages(&self) -> Result<Vec<Message>>;

    /// Removes the legacy flat message list after migration.
    async fn clear_legacy_messages(&self) -> Result<()>;
}
