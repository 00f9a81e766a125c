//! HttpCompletionService - reqwest client for the completion proxy.
//!
//! Talks to the floAiT proxy backend: `POST {base}/api/chat` with
//! `{"message": ...}`, expecting `{"reply": ...}`. The proxy owns all
//! retry logic; this client fails fast and lets the pipeline synthesize
//! the error bubble.

use async_trait::async_trait;
use floait_core::pipeline::{CompletionError, CompletionService};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Upper bound on one completion round trip. A slower call fails into
/// the pipeline's error path rather than blocking the widget.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: String,
}

/// Completion service that talks to the proxy over HTTP.
#[derive(Clone)]
pub struct HttpCompletionService {
    client: Client,
    base_url: String,
}

impl HttpCompletionService {
    /// Creates a client against the default local proxy.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a specific proxy base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

impl Default for HttpCompletionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for HttpCompletionService {
    async fn complete(&self, message: &str) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(self.endpoint())
            .timeout(REQUEST_TIMEOUT)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|body| body.error)
                .unwrap_or_default();
            return Err(CompletionError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::Transport(err.to_string()))?;
        debug!(chars = body.reply.len(), "completion reply received");
        Ok(body.reply)
    }
}
