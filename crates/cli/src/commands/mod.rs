//! CLI subcommands and shared wiring.

pub mod doctor;
pub mod generate;
pub mod ingest;
pub mod serve;

use std::sync::Arc;
use std::time::Duration;

use packwise_config::AppConfig;
use packwise_context::{ContextGatherer, DestinationWhitelist};
use packwise_engine::Orchestrator;
use packwise_retrieval::{QdrantClient, RetrievalClient};
use tracing::warn;

/// Wire the full pipeline from configuration.
///
/// Dataset problems are startup warnings, not hard failures: a missing
/// weather file leaves the gatherer empty and the prompt wording adapts, a
/// missing whitelist allows every destination.
pub(crate) fn build_pipeline(config: &AppConfig) -> (Orchestrator, DestinationWhitelist) {
    let chat = packwise_providers::chat_model_from_config(config);
    let embedder = packwise_providers::embedder_from_config(config);

    let store = Arc::new(qdrant_client(config));
    let retriever = Arc::new(RetrievalClient::new(
        embedder,
        store,
        config.retrieval.top_k,
        config.retrieval.min_score,
    ));

    let context = match ContextGatherer::from_files(
        &config.datasets.weather_file,
        &config.datasets.culture_file,
    ) {
        Ok(gatherer) => gatherer,
        Err(e) => {
            warn!(error = %e, "Context datasets unavailable; continuing without them");
            ContextGatherer::from_records(vec![], vec![])
        }
    };

    let whitelist = match DestinationWhitelist::from_file(&config.datasets.whitelist_file) {
        Ok(whitelist) => whitelist,
        Err(e) => {
            warn!(error = %e, "Destination whitelist unavailable; allowing all destinations");
            DestinationWhitelist::allow_all()
        }
    };

    let orchestrator = Orchestrator::new(retriever, Arc::new(context), chat)
        .use_fallback_on_error(config.orchestrator.use_fallback_on_error);

    (orchestrator, whitelist)
}

pub(crate) fn qdrant_client(config: &AppConfig) -> QdrantClient {
    QdrantClient::new(
        &config.retrieval.url,
        &config.retrieval.collection,
        Duration::from_secs(config.retrieval.timeout_secs),
    )
}
