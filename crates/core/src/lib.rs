//! # Packwise Core
//!
//! Domain types, traits, and error definitions for the Packwise
//! retrieval-augmented packing-list engine. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every external service the pipeline talks to (chat model, embedding
//! provider, vector store retrieval) is defined as a trait here.
//! Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod context;
pub mod error;
pub mod packing;
pub mod provider;
pub mod request;
pub mod retrieval;

// Re-export key types at crate root for ergonomics
pub use context::{ContextBundle, CultureTip, TipImportance, WeatherInfo};
pub use error::{Error, GenerationError, RequestError, Result, RetrievalError, ValidationError};
pub use packing::{
    GenerationOutcome, ItemViolation, PackingCategories, PackingItem, Provenance, StageTimings,
};
pub use provider::{ChatModel, Embedder, ItemRetriever, PromptPayload};
pub use request::{Season, TravelRequest, TravelType};
pub use retrieval::{Importance, KnowledgeEntry, RetrievedItem};
