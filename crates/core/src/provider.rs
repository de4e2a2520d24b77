//! Traits over the external services the pipeline coordinates.
//!
//! A [`ChatModel`] turns a prompt pair into raw text, an [`Embedder`] turns
//! text into fixed-dimension vectors, and an [`ItemRetriever`] performs the
//! whole retrieval step for a request. The engine calls these without
//! knowing which backend is wired in — pure polymorphism, and trivial to
//! mock in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, RetrievalError};
use crate::request::TravelRequest;
use crate::retrieval::RetrievedItem;

/// The system/user prompt pair handed to a chat model.
///
/// Purely derived and deterministic given its inputs, which makes prompt
/// construction snapshot-testable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayload {
    /// The system prompt: role, source-of-truth rules, output contract.
    pub system: String,

    /// The user prompt: trip facts, context blocks, retrieved items.
    pub user: String,
}

/// A chat/completion backend.
///
/// Implementations classify transport failures into the four
/// [`GenerationError`] kinds and perform **no retries** — retry policy, if
/// any, belongs to the caller. This keeps the implementation a thin,
/// swappable transport boundary.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// A human-readable name for this backend (e.g., "openai").
    fn name(&self) -> &str;

    /// Send the prompt pair, return the raw model text.
    async fn generate(
        &self,
        system: &str,
        user: &str,
    ) -> std::result::Result<String, GenerationError>;

    /// Health check — can we reach the backend?
    async fn health_check(&self) -> std::result::Result<bool, GenerationError> {
        Ok(true)
    }
}

/// An embedding backend producing fixed-dimension vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// A human-readable name for this backend.
    fn name(&self) -> &str;

    /// Output dimensionality (fixed by the chosen model, e.g. 1536).
    fn dimensions(&self) -> usize;

    /// Embed a batch of texts, one vector per input, in order.
    async fn embed(
        &self,
        texts: &[String],
    ) -> std::result::Result<Vec<Vec<f32>>, RetrievalError>;

    /// Embed a single text.
    async fn embed_one(&self, text: &str) -> std::result::Result<Vec<f32>, RetrievalError> {
        let texts = [text.to_string()];
        let mut vectors = self.embed(&texts).await?;
        vectors
            .pop()
            .ok_or_else(|| RetrievalError::Malformed("empty embedding batch response".into()))
    }
}

/// The retrieval step of the pipeline.
///
/// By contract this **cannot fail**: any transport problem on the embedding
/// or vector-store side degrades to an empty result, which is itself a valid
/// signal — the prompt builder switches to its conservative branch.
#[async_trait]
pub trait ItemRetriever: Send + Sync {
    /// Return ranked, pre-filtered items for the request; empty on degrade.
    async fn search(&self, request: &TravelRequest) -> Vec<RetrievedItem>;
}
