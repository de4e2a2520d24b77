//! `packwise ingest` — Embed the knowledge file and load the vector store.

use std::path::PathBuf;

use packwise_config::AppConfig;
use packwise_retrieval::{ingest_entries, load_knowledge_file};

pub async fn run(file_override: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let path = file_override.unwrap_or_else(|| config.datasets.knowledge_file.clone());
    let entries = load_knowledge_file(&path)?;

    println!("🎒 Packwise Ingestion");
    println!("   Knowledge file: {} ({} entries)", path.display(), entries.len());
    println!(
        "   Target: {}/{}",
        config.retrieval.url, config.retrieval.collection
    );

    let embedder = packwise_providers::embedder_from_config(&config);
    let store = super::qdrant_client(&config);

    let report = ingest_entries(embedder.as_ref(), &store, &entries).await?;

    println!(
        "✅ Upserted {} of {} entries in {} batch(es)",
        report.upserted, report.total, report.batches
    );
    Ok(())
}
