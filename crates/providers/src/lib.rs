//! Provider implementations for Packwise.
//!
//! Two thin HTTP clients over OpenAI-compatible endpoints:
//! - [`OpenAiChatClient`] — chat completions (the generation boundary)
//! - [`OpenAiEmbedder`] — text embeddings (the retrieval-side vectorizer)
//!
//! Both are transport boundaries only: failures are classified, never
//! retried here.

mod embeddings;
mod openai_chat;

pub use embeddings::OpenAiEmbedder;
pub use openai_chat::OpenAiChatClient;

use packwise_config::AppConfig;
use std::sync::Arc;

/// Build the chat model configured in `config`.
pub fn chat_model_from_config(config: &AppConfig) -> Arc<OpenAiChatClient> {
    Arc::new(OpenAiChatClient::new(
        &config.generation.api_url,
        config.api_key.clone().unwrap_or_default(),
        &config.generation.model,
        config.generation.temperature,
        config.generation.max_tokens,
        std::time::Duration::from_secs(config.generation.timeout_secs),
    ))
}

/// Build the embedder configured in `config`.
pub fn embedder_from_config(config: &AppConfig) -> Arc<OpenAiEmbedder> {
    Arc::new(OpenAiEmbedder::new(
        &config.generation.api_url,
        config.api_key.clone().unwrap_or_default(),
        &config.retrieval.embedding_model,
        config.retrieval.embedding_dimensions,
        std::time::Duration::from_secs(config.retrieval.timeout_secs),
    ))
}
