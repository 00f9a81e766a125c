//! Completion service trait.
//!
//! The seam between the pipeline and whatever produces assistant replies
//! (in production, the HTTP proxy client in `floait-interaction`).

use async_trait::async_trait;
use thiserror::Error;

/// Errors a completion service can surface.
///
/// The pipeline treats every variant uniformly as a failed send; the
/// distinction only matters for logs.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The request did not complete within the client's timeout bound.
    #[error("completion request timed out")]
    Timeout,

    /// The service answered with a non-2xx status.
    #[error("completion service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure (DNS, refused, reset, ...).
    #[error("completion transport error: {0}")]
    Transport(String),
}

/// Produces an assistant reply for a single user message.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one user message and returns the reply text.
    async fn complete(&self, message: &str) -> Result<String, CompletionError>;
}
