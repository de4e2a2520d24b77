//! Knowledge-base ingestion — embed curated entries and upsert them into the
//! vector store.
//!
//! This is an operator path, not a request path: failures escalate instead
//! of degrading, so a half-loaded collection is never mistaken for success.

use packwise_core::error::{Error, RetrievalError};
use packwise_core::provider::Embedder;
use packwise_core::retrieval::KnowledgeEntry;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::qdrant::{Point, PointPayload, QdrantClient};

/// Entries embedded per provider call.
const BATCH_SIZE: usize = 100;

/// Summary of an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Entries read from the knowledge file.
    pub total: usize,
    /// Points written to the store.
    pub upserted: usize,
    /// Embedding batches issued.
    pub batches: usize,
}

/// Load the curated knowledge file (JSON list of entries).
pub fn load_knowledge_file(path: &Path) -> Result<Vec<KnowledgeEntry>, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read knowledge file {}: {e}", path.display()),
    })?;

    let entries: Vec<KnowledgeEntry> = serde_json::from_str(&content)?;
    Ok(entries)
}

/// Embed all entries and upsert them into the collection.
pub async fn ingest_entries(
    embedder: &dyn Embedder,
    store: &QdrantClient,
    entries: &[KnowledgeEntry],
) -> Result<IngestReport, RetrievalError> {
    let mut upserted = 0;
    let mut batches = 0;

    for chunk in entries.chunks(BATCH_SIZE) {
        let texts: Vec<String> = chunk.iter().map(KnowledgeEntry::embedding_text).collect();
        let vectors = embedder.embed(&texts).await?;

        if vectors.len() != chunk.len() {
            return Err(RetrievalError::Malformed(format!(
                "Embedder returned {} vectors for {} entries",
                vectors.len(),
                chunk.len()
            )));
        }

        let points: Vec<Point> = chunk
            .iter()
            .zip(vectors)
            .map(|(entry, vector)| Point {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: payload_for(entry),
            })
            .collect();

        store.upsert_points(points).await?;
        upserted += chunk.len();
        batches += 1;

        info!(upserted, total = entries.len(), "Ingestion progress");
    }

    Ok(IngestReport {
        total: entries.len(),
        upserted,
        batches,
    })
}

fn payload_for(entry: &KnowledgeEntry) -> PointPayload {
    PointPayload {
        item: entry.item.clone(),
        category: entry.category.clone(),
        quantity: entry.quantity,
        reason: entry.reason.clone(),
        importance: entry.importance,
        tags: entry.tags.clone(),
        destination_type: entry.destination_type.clone(),
        travel_type: entry.travel_type.clone(),
        season: entry.seasons.clone(),
        climate: entry.climate.clone(),
    }
}
