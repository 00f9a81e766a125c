//! JSON file-backed key-value storage.
//!
//! Each logical key maps to one JSON file under the base directory
//! (`<data_dir>/floait/<key>.json` by default). This mirrors the
//! per-key blob layout the widget used in browser storage, so every key
//! loads and saves independently.
//!
//! A missing file, an empty file, or a corrupt payload all load as
//! `None`; storage corruption must never crash the application.

use floait_core::error::{FloaitError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Well-known storage keys. The legacy flat message list is only read by
/// the startup migration.
pub mod keys {
    pub const CONVERSATIONS: &str = "conversations";
    pub const LEGACY_MESSAGES: &str = "messages";
    pub const ACTIVE_CONVERSATION_ID: &str = "active_conversation_id";
    pub const DARK_MODE: &str = "dark_mode";
}

/// Key-value JSON storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    base_dir: PathBuf,
}

impl JsonStorage {
    /// Creates storage rooted at the given directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Creates storage at the default location (`<data_dir>/floait`).
    pub fn default_location() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| FloaitError::io("Cannot find data directory"))?;
        Ok(Self::new(data_dir.join("floait")))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Loads and deserializes the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent or the stored payload
    /// cannot be parsed (logged at `warn`).
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(key, error = %err, "stored payload is corrupt, treating as absent");
                Ok(None)
            }
        }
    }

    /// Serializes and stores `value` under `key`, creating the base
    /// directory on first use. Durable when the method returns.
    pub async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;
        let payload = serde_json::to_string_pretty(value)?;
        fs::write(self.key_path(key), payload).await?;
        Ok(())
    }

    /// Removes the value stored under `key`. Removing an absent key is
    /// not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_missing_key_returns_none() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());

        let loaded: Option<Vec<String>> = storage.load("nothing").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());

        storage
            .save("greeting", &vec!["hello".to_string(), "world".to_string()])
            .await
            .unwrap();
        let loaded: Option<Vec<String>> = storage.load("greeting").await.unwrap();

        assert_eq!(loaded.unwrap(), vec!["hello", "world"]);
    }

    #[tokio::test]
    async fn test_corrupt_payload_loads_as_none() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());
        std::fs::write(dir.path().join("broken.json"), "{not json at all").unwrap();

        let loaded: Option<Vec<String>> = storage.load("broken").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_empty_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());
        std::fs::write(dir.path().join("empty.json"), "  \n").unwrap();

        let loaded: Option<bool> = storage.load("empty").await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::new(dir.path());

        storage.save("gone", &true).await.unwrap();
        storage.remove("gone").await.unwrap();
        storage.remove("gone").await.unwrap();

        let loaded: Option<bool> = storage.load("gone").await.unwrap();
        assert!(loaded.is_none());
    }
}
