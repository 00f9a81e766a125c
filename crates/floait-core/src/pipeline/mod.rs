//! Message pipeline.
//!
//! Orchestrates one send operation: optimistic append of the user
//! message, the remote completion call, and the append of the reply (or a
//! synthesized error bubble) to the conversation the message was sent
//! from.
//!
//! State machine per send: `Idle -> Sending -> {Succeeded, Failed} ->
//! Idle`. Only one send may be in flight at a time; a send attempted
//! while another is in flight (or with blank input) is rejected silently.

mod service;

pub use service::{CompletionError, CompletionService};

use crate::conversation::{ConversationStore, Message, TITLE_MAX_CHARS};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Reply text used when the service returns an empty reply.
pub const EMPTY_REPLY_FALLBACK: &str = "No response received.";

/// Fixed text of the assistant bubble synthesized on any remote failure.
pub const SEND_ERROR_TEXT: &str = "Error: Could not get AI response";

/// Observable state of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
    Succeeded,
    Failed,
}

/// Result of a `send` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or another send in flight; nothing changed.
    Rejected,
    /// The reply was appended to the named conversation.
    Replied { conversation_id: String },
    /// The remote call failed; an error bubble was appended instead.
    Failed { conversation_id: String },
}

/// Drives the send -> remote-call -> append sequence for user messages.
///
/// The target conversation id is captured at send time, so a reply always
/// lands in the conversation it was sent from even if the user switches
/// conversations while the call is in flight.
pub struct MessagePipeline {
    store: Arc<RwLock<ConversationStore>>,
    completion: Arc<dyn CompletionService>,
    state: Arc<Mutex<SendState>>,
}

impl MessagePipeline {
    pub fn new(
        store: Arc<RwLock<ConversationStore>>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            store,
            completion,
            state: Arc::new(Mutex::new(SendState::Idle)),
        }
    }

    /// Sends one user message through the pipeline.
    ///
    /// The user message is appended before the remote call resolves
    /// (optimistic append); the embedder may clear its input buffer as
    /// soon as this method has been invoked.
    pub async fn send(&self, text: &str) -> Result<SendOutcome> {
        if text.trim().is_empty() {
            return Ok(SendOutcome::Rejected);
        }

        // Single-flight guard: reject, never queue.
        {
            let mut state = self.state.lock().await;
            if *state == SendState::Sending {
                debug!("send rejected: another send is in flight");
                return Ok(SendOutcome::Rejected);
            }
            *state = SendState::Sending;
        }

        let result = self.run(text).await;
        if result.is_err() {
            // Persistence failed mid-send; the pipeline must still come
            // back to Idle so further sends are possible.
            *self.state.lock().await = SendState::Idle;
        }
        result
    }

    async fn run(&self, text: &str) -> Result<SendOutcome> {
        let user_message = Message::user(text);
        let user_text = user_message.text.clone();

        // Capture the target conversation now, not when the reply arrives.
        let conversation_id = {
            let mut store = self.store.write().await;
            let conversation_id = store.ensure_active().await?;
            store
                .append_message(&conversation_id, user_message)
                .await?;
            conversation_id
        };

        match self.completion.complete(text).await {
            Ok(reply) => {
                let reply_text = if reply.trim().is_empty() {
                    EMPTY_REPLY_FALLBACK.to_string()
                } else {
                    reply
                };
                {
                    let mut store = self.store.write().await;
                    store
                        .append_message(&conversation_id, Message::assistant(reply_text))
                        .await?;
                    let title: String = user_text.chars().take(TITLE_MAX_CHARS).collect();
                    store.set_title_if_default(&conversation_id, &title).await?;
                }
                self.finish(SendState::Succeeded).await;
                Ok(SendOutcome::Replied { conversation_id })
            }
            Err(err) => {
                warn!(error = %err, "completion call failed, appending error bubble");
                {
                    let mut store = self.store.write().await;
                    store
                        .append_message(&conversation_id, Message::assistant(SEND_ERROR_TEXT))
                        .await?;
                }
                self.finish(SendState::Failed).await;
                Ok(SendOutcome::Failed { conversation_id })
            }
        }
    }

    async fn finish(&self, terminal: SendState) {
        let mut state = self.state.lock().await;
        *state = terminal;
        // The terminal state is transient; input re-enables at Idle.
        *state = SendState::Idle;
    }

    /// Current pipeline state.
    pub async fn state(&self) -> SendState {
        *self.state.lock().await
    }

    /// Whether a send is currently in flight (the UI disables input then).
    pub async fn is_sending(&self) -> bool {
        self.state().await == SendState::Sending
    }
}
