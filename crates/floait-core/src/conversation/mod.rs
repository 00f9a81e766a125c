//! Conversation domain module.
//!
//! This module contains all conversation-related domain models, the
//! repository interface, and the store that manages conversation state.
//!
//! # Module Structure
//!
//! - `model`: Core conversation domain model (`Conversation`)
//! - `message`: Message types (`MessageSender`, `Message`)
//! - `repository`: Repository trait for conversation persistence
//! - `store`: Conversation state management (`ConversationStore`)

mod message;
mod model;
mod repository;
mod store;

// Re-export public API
pub use message::{Message, MessageSender};
pub use model::{Conversation, DEFAULT_TITLE, TITLE_MAX_CHARS};
pub use repository::ConversationRepository;
pub use store::{ConversationStore, StateSnapshot};
