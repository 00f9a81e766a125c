//! Upstream Gemini client.
//!
//! Calls the generative-language REST API directly. Errors are split
//! into retryable (rate-limit/overload/transport) and terminal so the
//! route layer can apply its backoff policy.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Failure talking to the upstream model.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Rate-limit/overload signal or transport hiccup; worth retrying.
    #[error("upstream overloaded: {0}")]
    Retryable(String),

    /// Anything else; retrying will not help.
    #[error("upstream error: {0}")]
    Terminal(String),
}

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL (tests and regional endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generates one reply for a plain-text user message.
    pub async fn generate(&self, message: &str) -> Result<String, UpstreamError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
        };

        let response = self.client.post(url).json(&body).send().await.map_err(|err| {
            if err.is_connect() || err.is_timeout() {
                UpstreamError::Retryable(format!("Gemini API request failed: {err}"))
            } else {
                UpstreamError::Terminal(format!("Gemini API request failed: {err}"))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| UpstreamError::Terminal(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, UpstreamError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            UpstreamError::Terminal("Gemini API returned no text in the response candidates".into())
        })
}

fn map_http_error(status: StatusCode, body: String) -> UpstreamError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    if is_retryable {
        UpstreamError::Retryable(message)
    } else {
        UpstreamError::Terminal(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_reads_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "hello from gemini"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "hello from gemini");
    }

    #[test]
    fn test_extract_text_takes_first_of_multiple_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "first");
    }

    #[test]
    fn test_extract_text_fails_on_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_text_response(response),
            Err(UpstreamError::Terminal(_))
        ));
    }

    #[test]
    fn test_rate_limit_maps_to_retryable_with_api_message() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, body.to_string());
        match err {
            UpstreamError::Retryable(message) => {
                assert_eq!(message, "RESOURCE_EXHAUSTED: Quota exceeded")
            }
            other => panic!("expected retryable, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_request_maps_to_terminal() {
        let err = map_http_error(StatusCode::BAD_REQUEST, "oops".to_string());
        assert!(matches!(err, UpstreamError::Terminal(_)));
    }

    #[test]
    fn test_unparsable_error_body_falls_back_to_raw_text() {
        let err = map_http_error(StatusCode::SERVICE_UNAVAILABLE, "plain text".to_string());
        match err {
            UpstreamError::Retryable(message) => assert_eq!(message, "plain text"),
            other => panic!("expected retryable, got {other:?}"),
        }
    }
}
