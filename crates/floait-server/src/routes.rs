//! HTTP routes of the completion proxy.
//!
//! One passthrough route: `POST /api/chat` takes `{"message"}` and
//! answers `{"reply"}`. Retryable upstream conditions get bounded
//! exponential backoff here; the widget client never retries.

use crate::gemini::{GeminiClient, UpstreamError};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Surfaced with `503` once the retry budget is exhausted.
pub const OVERLOAD_MESSAGE: &str =
    "The AI service is temporarily overloaded. Please try again in a moment.";

/// First backoff delay; doubles per attempt.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Retries after the initial attempt.
pub const MAX_RETRIES: u32 = 3;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub gemini: GeminiClient,
}

/// GET / — liveness probe.
pub async fn root() -> &'static str {
    "floAiT completion proxy is live"
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    if request.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Message is required".to_string(),
            }),
        )
            .into_response();
    }

    info!(chars = request.message.len(), "incoming chat message");

    let result = with_backoff(|attempt| {
        let gemini = state.gemini.clone();
        let message = request.message.clone();
        async move {
            if attempt > 0 {
                info!(attempt, "retrying upstream call");
            }
            gemini.generate(&message).await
        }
    })
    .await;

    completion_response(result)
}

/// Maps the backoff outcome onto the wire contract.
fn completion_response(result: Result<String, UpstreamError>) -> Response {
    match result {
        Ok(reply) => (StatusCode::OK, Json(ChatReply { reply })).into_response(),
        Err(UpstreamError::Retryable(message)) => {
            warn!(%message, "retry budget exhausted");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: OVERLOAD_MESSAGE.to_string(),
                }),
            )
                .into_response()
        }
        Err(UpstreamError::Terminal(message)) => {
            warn!(%message, "upstream call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: message }),
            )
                .into_response()
        }
    }
}

/// Delay before the retry following `attempt` (0-based).
fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.pow(attempt)
}

/// Runs `attempt_fn` with bounded exponential backoff on retryable
/// failures. Terminal failures short-circuit.
async fn with_backoff<F, Fut>(mut attempt_fn: F) -> Result<String, UpstreamError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<String, UpstreamError>>,
{
    let mut attempt = 0;
    loop {
        match attempt_fn(attempt).await {
            Ok(reply) => return Ok(reply),
            Err(UpstreamError::Retryable(message)) if attempt < MAX_RETRIES => {
                let delay = backoff_delay(attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, %message, "upstream overloaded, backing off");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_backoff_schedule_doubles_from_base() {
        assert_eq!(backoff_delay(0), Duration::from_millis(500));
        assert_eq!(backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_backoff_recovers_after_transient_overload() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_backoff(|_| {
            let calls = calls.clone();
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(UpstreamError::Retryable("overloaded".to_string()))
                } else {
                    Ok("recovered".to_string())
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_with_backoff_gives_up_after_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_backoff(|_| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<String, _>(UpstreamError::Retryable("still overloaded".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(UpstreamError::Retryable(_))));
        // Initial attempt + MAX_RETRIES retries
        assert_eq!(calls.load(Ordering::SeqCst), 1 + MAX_RETRIES);
    }

    async fn read_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message_with_400() {
        // Whitespace-only counts as empty; the upstream is never reached.
        let state = AppState {
            gemini: GeminiClient::new("test-key", "test-model")
                .with_base_url("http://127.0.0.1:9"),
        };
        let response = chat(
            State(state),
            Json(ChatRequest {
                message: "   ".to_string(),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Message is required" }));
    }

    #[tokio::test]
    async fn test_reply_maps_to_200_with_reply_body() {
        let response = completion_response(Ok("hi there".to_string()));

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body, serde_json::json!({ "reply": "hi there" }));
    }

    #[tokio::test]
    async fn test_exhausted_retries_map_to_503_with_fixed_message() {
        let response =
            completion_response(Err(UpstreamError::Retryable("overloaded".to_string())));

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = read_json(response).await;
        assert_eq!(body["error"], OVERLOAD_MESSAGE);
    }

    #[tokio::test]
    async fn test_terminal_failure_maps_to_500_with_upstream_message() {
        let response =
            completion_response(Err(UpstreamError::Terminal("API key not valid".to_string())));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["error"], "API key not valid");
    }

    #[tokio::test]
    async fn test_terminal_failure_short_circuits() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = with_backoff(|_| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<String, _>(UpstreamError::Terminal("bad request".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(UpstreamError::Terminal(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
