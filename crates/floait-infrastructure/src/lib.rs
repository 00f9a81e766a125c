//! floait-infrastructure: storage backends for the floAiT engine.
//!
//! Provides the JSON file-backed persistent store and the repository
//! implementations the core engine is wired with in production.

pub mod conversation_repository;
pub mod dto;
pub mod json_storage;
pub mod state_repository;

pub use conversation_repository::JsonConversationRepository;
pub use json_storage::{JsonStorage, keys};
pub use state_repository::JsonStateRepository;
