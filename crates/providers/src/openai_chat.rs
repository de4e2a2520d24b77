//! OpenAI-compatible chat completion client — the generation boundary.
//!
//! Works with OpenAI, OpenRouter, Ollama, vLLM, and any endpoint exposing a
//! compatible `/v1/chat/completions` route.
//!
//! Transport failures are classified into the four [`GenerationError`]
//! kinds. The HTTP status code is the primary signal; message-substring
//! matching is a last resort for transport errors that carry no status.
//! No retry happens here — retry/backoff, if desired, is the caller's
//! responsibility, keeping this a thin, swappable transport boundary.

use async_trait::async_trait;
use packwise_core::error::GenerationError;
use packwise_core::provider::ChatModel;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// An OpenAI-compatible chat model client.
pub struct OpenAiChatClient {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiChatClient {
    /// Create a new client against an OpenAI-compatible endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "openai".into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            max_tokens,
            client,
        }
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OpenAiChatClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        system: &str,
        user: &str,
    ) -> std::result::Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        });

        debug!(model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(classify_status(status, &error_body));
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| {
                GenerationError::Unavailable(format!("Failed to parse response: {e}"))
            })?;

        let choice = api_response.choices.into_iter().next().ok_or_else(|| {
            GenerationError::Unavailable("No choices in response".into())
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }

    async fn health_check(&self) -> std::result::Result<bool, GenerationError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(classify_transport)?;

        Ok(response.status().is_success())
    }
}

/// Map an HTTP status to the nearest [`GenerationError`] kind.
fn classify_status(status: u16, body: &str) -> GenerationError {
    let message = if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    };

    match status {
        401 | 403 => GenerationError::Authentication(message),
        429 => GenerationError::RateLimited(message),
        408 | 504 => GenerationError::Timeout(message),
        _ => GenerationError::Unavailable(message),
    }
}

/// Map a transport-level failure to the nearest [`GenerationError`] kind.
///
/// Structured signals (`is_timeout`, `is_connect`, embedded status) are
/// checked first. The trailing substring match is a known source of
/// misclassification kept only for opaque errors with no status attached.
fn classify_transport(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        return GenerationError::Timeout(e.to_string());
    }
    if let Some(status) = e.status() {
        return classify_status(status.as_u16(), &e.to_string());
    }
    if e.is_connect() {
        return GenerationError::Unavailable(e.to_string());
    }

    classify_message(&e.to_string())
}

/// Last-resort substring classification of an opaque transport error.
fn classify_message(message: &str) -> GenerationError {
    let lower = message.to_lowercase();
    if lower.contains("timed out") || lower.contains("timeout") {
        GenerationError::Timeout(message.into())
    } else if lower.contains("401") || lower.contains("unauthorized") {
        GenerationError::Authentication(message.into())
    } else if lower.contains("429") || lower.contains("rate limit") {
        GenerationError::RateLimited(message.into())
    } else {
        GenerationError::Unavailable(message.into())
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = OpenAiChatClient::new(
            "https://api.openai.com/v1/",
            "sk-test",
            "gpt-4o-mini",
            0.7,
            2048,
            Duration::from_secs(90),
        );
        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            classify_status(401, "bad key"),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(403, ""),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(429, "slow down"),
            GenerationError::RateLimited(_)
        ));
        assert!(matches!(
            classify_status(408, ""),
            GenerationError::Timeout(_)
        ));
        assert!(matches!(
            classify_status(504, ""),
            GenerationError::Timeout(_)
        ));
        assert!(matches!(
            classify_status(500, "boom"),
            GenerationError::Unavailable(_)
        ));
        assert!(matches!(
            classify_status(503, ""),
            GenerationError::Unavailable(_)
        ));
    }

    #[test]
    fn status_classification_keeps_body() {
        let err = classify_status(429, "Too Many Requests");
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too Many Requests"));
    }

    #[test]
    fn message_classification_fallback() {
        assert!(matches!(
            classify_message("connection timed out after 90s"),
            GenerationError::Timeout(_)
        ));
        assert!(matches!(
            classify_message("server said 401"),
            GenerationError::Authentication(_)
        ));
        assert!(matches!(
            classify_message("hit the rate limit"),
            GenerationError::RateLimited(_)
        ));
        assert!(matches!(
            classify_message("connection refused"),
            GenerationError::Unavailable(_)
        ));
    }

    #[test]
    fn parse_completion_response() {
        let data = r#"{
            "model": "gpt-4o-mini",
            "choices": [
                {"message": {"role": "assistant", "content": "{\"categories\": {}}"}}
            ]
        }"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("{\"categories\": {}}")
        );
    }

    #[test]
    fn parse_response_with_null_content() {
        let data = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ApiResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
