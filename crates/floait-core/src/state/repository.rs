//! State repository trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::model::Theme;

/// Repository for application-level state that persists across sessions:
/// the active-conversation pointer and the theme preference.
///
/// Every setter is durable before it returns; callers rely on
/// synchronous-on-write semantics so no mutation can be lost between
/// render cycles.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Gets the ID of the currently active conversation.
    async fn get_active_conversation(&self) -> Option<String>;

    /// Sets the ID of the currently active conversation.
    async fn set_active_conversation(&self, conversation_id: String) -> Result<()>;

    /// Clears the active conversation pointer.
    async fn clear_active_conversation(&self) -> Result<()>;

    /// Gets the persisted theme preference.
    async fn get_theme(&self) -> Theme;

    /// Sets the persisted theme preference.
    async fn set_theme(&self, theme: Theme) -> Result<()>;
}
