//! JSON-backed StateRepository implementation.
//!
//! The active-conversation pointer and the theme flag each live under
//! their own storage key; the pointer key is absent when no conversation
//! is active.

use crate::json_storage::{JsonStorage, keys};
use async_trait::async_trait;
use floait_core::error::Result;
use floait_core::state::{StateRepository, Theme};
use tracing::warn;

/// State repository over [`JsonStorage`].
pub struct JsonStateRepository {
    storage: JsonStorage,
}

impl JsonStateRepository {
    pub fn new(storage: JsonStorage) -> Self {
        Self { storage }
    }

    /// Creates a repository at the default storage location.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(JsonStorage::default_location()?))
    }
}

#[async_trait]
impl StateRepository for JsonStateRepository {
    async fn get_active_conversation(&self) -> Option<String> {
        match self.storage.load(keys::ACTIVE_CONVERSATION_ID).await {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "failed to read active conversation id");
                None
            }
        }
    }

    async fn set_active_conversation(&self, conversation_id: String) -> Result<()> {
        self.storage
            .save(keys::ACTIVE_CONVERSATION_ID, &conversation_id)
            .await
    }

    async fn clear_active_conversation(&self) -> Result<()> {
        self.storage.remove(keys::ACTIVE_CONVERSATION_ID).await
    }

    async fn get_theme(&self) -> Theme {
        let dark = match self.storage.load(keys::DARK_MODE).await {
            Ok(flag) => flag.unwrap_or(false),
            Err(err) => {
                warn!(error = %err, "failed to read theme preference");
                false
            }
        };
        Theme::from_dark_flag(dark)
    }

    async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.save(keys::DARK_MODE, &theme.is_dark()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_active_conversation_round_trip() {
        let dir = tempdir().unwrap();
        let repository = JsonStateRepository::new(JsonStorage::new(dir.path()));

        assert!(repository.get_active_conversation().await.is_none());

        repository
            .set_active_conversation("conv-1".to_string())
            .await
            .unwrap();
        assert_eq!(
            repository.get_active_conversation().await.as_deref(),
            Some("conv-1")
        );

        repository.clear_active_conversation().await.unwrap();
        assert!(repository.get_active_conversation().await.is_none());
    }

    #[tokio::test]
    async fn test_theme_defaults_to_light_and_round_trips() {
        let dir = tempdir().unwrap();
        let repository = JsonStateRepository::new(JsonStorage::new(dir.path()));

        assert_eq!(repository.get_theme().await, Theme::Light);

        repository.set_theme(Theme::Dark).await.unwrap();
        assert_eq!(repository.get_theme().await, Theme::Dark);
    }

    #[tokio::test]
    async fn test_corrupt_pointer_is_treated_as_absent() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("active_conversation_id.json"), "{{{").unwrap();
        let repository = JsonStateRepository::new(JsonStorage::new(dir.path()));

        assert!(repository.get_active_conversation().await.is_none());
    }
}
