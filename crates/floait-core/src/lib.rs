//! floait-core: conversation/state-management engine for the floAiT
//! chat widget.
//!
//! The engine owns messages, multiple named conversations, persistence
//! write-through, the send pipeline, and reversible bulk deletion. The
//! presentation layer stays purely reactive on top of these contracts.

pub mod conversation;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod undo;

#[cfg(test)]
mod test_support;

// Re-export common error type
pub use error::FloaitError;

pub use conversation::{
    Conversation, ConversationRepository, ConversationStore, Message, MessageSender,
    StateSnapshot,
};
pub use pipeline::{CompletionError, CompletionService, MessagePipeline, SendOutcome, SendState};
pub use state::{StateRepository, Theme};
pub use undo::UndoDeleteManager;
