//! Configuration loading, validation, and management for Packwise.
//!
//! Loads configuration from `~/.packwise/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.packwise/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the generation/embedding provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Generation model configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Vector-store retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Static dataset locations
    #[serde(default)]
    pub datasets: DatasetConfig,

    /// Orchestrator policy
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("generation", &self.generation)
            .field("retrieval", &self.retrieval)
            .field("datasets", &self.datasets)
            .field("orchestrator", &self.orchestrator)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Chat model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0 = deterministic, 2.0 = maximum)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Read timeout for the generation call, seconds
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_generation_timeout() -> u64 {
    90
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Vector store base URL
    #[serde(default = "default_vector_url")]
    pub url: String,

    /// Collection holding the packing knowledge base
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Minimum similarity score; lower-scoring points never leave the store
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Maximum number of retrieved items
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensionality (fixed by the model)
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,

    /// Timeout for retrieval-side calls, seconds
    #[serde(default = "default_retrieval_timeout")]
    pub timeout_secs: u64,
}

fn default_vector_url() -> String {
    "http://localhost:6333".into()
}
fn default_collection() -> String {
    "packing_items".into()
}
fn default_min_score() -> f32 {
    0.40
}
fn default_top_k() -> usize {
    20
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_embedding_dimensions() -> usize {
    1536
}
fn default_retrieval_timeout() -> u64 {
    10
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            url: default_vector_url(),
            collection: default_collection(),
            min_score: default_min_score(),
            top_k: default_top_k(),
            embedding_model: default_embedding_model(),
            embedding_dimensions: default_embedding_dimensions(),
            timeout_secs: default_retrieval_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Weather dataset (JSON), keyed by location and season
    #[serde(default = "default_weather_file")]
    pub weather_file: PathBuf,

    /// Culture tips dataset (JSON), keyed by location
    #[serde(default = "default_culture_file")]
    pub culture_file: PathBuf,

    /// Destination whitelist (JSON list); empty list allows everything
    #[serde(default = "default_whitelist_file")]
    pub whitelist_file: PathBuf,

    /// Curated packing knowledge file (JSON) for ingestion
    #[serde(default = "default_knowledge_file")]
    pub knowledge_file: PathBuf,
}

fn default_weather_file() -> PathBuf {
    PathBuf::from("data/weather.json")
}
fn default_culture_file() -> PathBuf {
    PathBuf::from("data/culture_tips.json")
}
fn default_whitelist_file() -> PathBuf {
    PathBuf::from("data/destinations.json")
}
fn default_knowledge_file() -> PathBuf {
    PathBuf::from("data/packing_knowledge.json")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            weather_file: default_weather_file(),
            culture_file: default_culture_file(),
            whitelist_file: default_whitelist_file(),
            knowledge_file: default_knowledge_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Substitute the deterministic fallback on generation/validation
    /// failure. When false, errors re-raise to the caller (diagnostic mode).
    #[serde(default = "default_true")]
    pub use_fallback_on_error: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            use_fallback_on_error: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8720
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.packwise/config.toml).
    ///
    /// Also checks environment variables:
    /// - `PACKWISE_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `PACKWISE_MODEL` overrides the chat model
    /// - `PACKWISE_VECTOR_URL` overrides the vector store URL
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("PACKWISE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("PACKWISE_MODEL") {
            config.generation.model = model;
        }

        if let Ok(url) = std::env::var("PACKWISE_VECTOR_URL") {
            config.retrieval.url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".packwise")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.temperature < 0.0 || self.generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.retrieval.min_score) {
            return Err(ConfigError::ValidationError(
                "retrieval.min_score must be between 0.0 and 1.0".into(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.top_k must be at least 1".into(),
            ));
        }

        if self.retrieval.embedding_dimensions == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.embedding_dimensions must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for first-run setup).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            generation: GenerationConfig::default(),
            retrieval: RetrievalConfig::default(),
            datasets: DatasetConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
