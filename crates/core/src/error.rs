//! Error types for the Packwise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant. The original design's
//! one-exception-subtype-per-failure-mode hierarchy is collapsed into
//! discriminated enum variants that the orchestrator matches on.

use thiserror::Error;

/// The top-level error type for all Packwise operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Generation errors ---
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    // --- Output validation errors ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Retrieval errors (escalate only on operator paths like ingestion) ---
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    // --- Request construction errors ---
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the generation provider, classified from transport signals.
///
/// Every transport failure maps to the *nearest* of these four kinds; the
/// orchestrator only ever switches on the kind, never on message content.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Failures of structured-output validation.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Response did not contain valid JSON: {0}")]
    InvalidJson(String),

    /// Every violated business rule, collected — never just the first.
    #[error("Schema validation failed: {}", .violations.join("; "))]
    SchemaViolations { violations: Vec<String> },
}

/// Failures of the retrieval side (embedding call or vector store).
///
/// On the request path these are absorbed into an empty result set; they
/// escalate only on operator paths (ingestion, health probes).
#[derive(Debug, Clone, Error)]
pub enum RetrievalError {
    #[error("Vector store request failed: {message} (status: {status})")]
    Store { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Failures constructing a [`crate::TravelRequest`].
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    #[error("Destination must not be blank")]
    BlankDestination,

    #[error("Duration must be between 1 and 365 days, got {0}")]
    InvalidDuration(u32),
}
