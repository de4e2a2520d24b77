//! OpenAI-compatible embedding client — the retrieval-side vectorizer.
//!
//! Failures here surface as [`RetrievalError`]; on the request path the
//! retrieval client absorbs them into an empty result set, on the ingestion
//! path they escalate to the operator.

use async_trait::async_trait;
use packwise_core::error::RetrievalError;
use packwise_core::provider::Embedder;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// An OpenAI-compatible embedding client with fixed output dimensionality.
pub struct OpenAiEmbedder {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
    client: reqwest::Client,
}

impl OpenAiEmbedder {
    /// Create a new embedder against an OpenAI-compatible endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "openai-embeddings".into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimensions,
            client,
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, RetrievalError> {
        let url = format!("{}/embeddings", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
            "dimensions": self.dimensions,
            "encoding_format": "float",
        });

        debug!(model = %self.model, count = texts.len(), "Sending embedding request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RetrievalError::Timeout(e.to_string())
                } else {
                    RetrievalError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Store {
                status,
                message: error_body,
            });
        }

        let api_resp: EmbeddingApiResponse = response.json().await.map_err(|e| {
            RetrievalError::Malformed(format!("Failed to parse embedding response: {e}"))
        })?;

        if api_resp.data.len() != texts.len() {
            return Err(RetrievalError::Malformed(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                api_resp.data.len()
            )));
        }

        Ok(api_resp.data.into_iter().map(|d| d.embedding).collect())
    }
}

// --- Embedding API types ---

#[derive(Debug, Deserialize)]
struct EmbeddingApiResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
