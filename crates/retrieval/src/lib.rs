//! Retrieval for Packwise — similarity search over the curated packing
//! knowledge base, plus the ingestion pipeline that populates it.
//!
//! The request path ([`RetrievalClient`]) deliberately degrades in place:
//! any failure of the embedding call or the vector-store call yields an
//! empty result instead of an error. Empty output is itself a valid signal —
//! the prompt builder switches to its conservative branch. The ingestion
//! path ([`ingest::ingest_entries`]) is an operator tool and escalates
//! failures normally.

pub mod ingest;
pub mod qdrant;
pub mod query;

pub use ingest::{IngestReport, ingest_entries, load_knowledge_file};
pub use qdrant::{Point, PointPayload, QdrantClient, ScoredPoint};

use async_trait::async_trait;
use packwise_core::provider::{Embedder, ItemRetriever};
use packwise_core::request::TravelRequest;
use packwise_core::retrieval::RetrievedItem;
use std::sync::Arc;
use tracing::{debug, warn};

/// The retrieval step: query text → embedding → filtered similarity search.
///
/// Stateless across calls; safe to share behind an `Arc`.
pub struct RetrievalClient {
    embedder: Arc<dyn Embedder>,
    store: Arc<QdrantClient>,
    top_k: usize,
    min_score: f32,
}

impl RetrievalClient {
    /// Create a retrieval client.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<QdrantClient>,
        top_k: usize,
        min_score: f32,
    ) -> Self {
        Self {
            embedder,
            store,
            top_k,
            min_score,
        }
    }
}

#[async_trait]
impl ItemRetriever for RetrievalClient {
    async fn search(&self, request: &TravelRequest) -> Vec<RetrievedItem> {
        let query = query::build_query(request);

        let vector = match self.embedder.embed_one(&query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Embedding failed; degrading to empty retrieval");
                return Vec::new();
            }
        };

        let points = match self
            .store
            .search_points(
                &vector,
                self.top_k,
                self.min_score,
                request.travel_type.filter_value(),
                request.season.filter_value(),
            )
            .await
        {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "Vector search failed; degrading to empty retrieval");
                return Vec::new();
            }
        };

        let items = rank_points(points, self.top_k);
        debug!(count = items.len(), "Retrieval complete");
        items
    }
}

/// Map scored points to [`RetrievedItem`]s, sorted descending by score and
/// truncated to `top_k`. The store already ranks and filters; the sort here
/// makes the ordering contract hold regardless of backend behavior.
fn rank_points(points: Vec<ScoredPoint>, top_k: usize) -> Vec<RetrievedItem> {
    let mut items: Vec<RetrievedItem> = points
        .into_iter()
        .map(|point| RetrievedItem {
            item: point.payload.item,
            category: point.payload.category,
            quantity: point.payload.quantity,
            reason: point.payload.reason,
            score: point.score,
            importance: point.payload.importance,
            tags: point.payload.tags,
        })
        .collect();

    items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    items.truncate(top_k);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use packwise_core::error::RetrievalError;
    use packwise_core::request::{Season, TravelType};
    use packwise_core::retrieval::Importance;
    use std::sync::Mutex;
    use std::time::Duration;

    fn request() -> TravelRequest {
        TravelRequest::new("Dubai", 5, TravelType::Business, Season::Summer).unwrap()
    }

    fn point(item: &str, score: f32) -> ScoredPoint {
        serde_json::from_value(serde_json::json!({
            "id": item,
            "score": score,
            "payload": {
                "item": item,
                "category": "clothing",
                "quantity": 2,
                "reason": "needed",
                "importance": "high",
                "tags": ["a"]
            }
        }))
        .unwrap()
    }

    /// An embedder that always fails, counting calls.
    struct FailingEmbedder {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Embedder for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn embed(
            &self,
            _texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, RetrievalError> {
            *self.calls.lock().unwrap() += 1;
            Err(RetrievalError::Network("connection refused".into()))
        }
    }

    /// An embedder that returns a fixed vector.
    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        fn name(&self) -> &str {
            "fixed"
        }

        fn dimensions(&self) -> usize {
            3
        }

        async fn embed(
            &self,
            texts: &[String],
        ) -> std::result::Result<Vec<Vec<f32>>, RetrievalError> {
            Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
        }
    }

    fn unreachable_store() -> Arc<QdrantClient> {
        // Port 9 (discard) is closed; connections fail immediately.
        Arc::new(QdrantClient::new(
            "http://127.0.0.1:9",
            "packing_items",
            Duration::from_millis(500),
        ))
    }

    #[tokio::test]
    async fn embedding_failure_degrades_to_empty() {
        let embedder = Arc::new(FailingEmbedder {
            calls: Mutex::new(0),
        });
        let client = RetrievalClient::new(embedder.clone(), unreachable_store(), 20, 0.4);

        let items = client.search(&request()).await;
        assert!(items.is_empty());
        assert_eq!(*embedder.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty() {
        let client = RetrievalClient::new(Arc::new(FixedEmbedder), unreachable_store(), 20, 0.4);
        let items = client.search(&request()).await;
        assert!(items.is_empty());
    }

    #[test]
    fn rank_points_sorts_descending() {
        let points = vec![point("low", 0.41), point("high", 0.93), point("mid", 0.70)];
        let items = rank_points(points, 20);
        assert_eq!(items[0].item, "high");
        assert_eq!(items[1].item, "mid");
        assert_eq!(items[2].item, "low");
    }

    #[test]
    fn rank_points_truncates_to_top_k() {
        let points = (0..30)
            .map(|i| point(&format!("item{i}"), 0.9 - i as f32 * 0.01))
            .collect();
        let items = rank_points(points, 20);
        assert_eq!(items.len(), 20);
    }

    #[test]
    fn rank_points_maps_payload_fields() {
        let items = rank_points(vec![point("Sunscreen", 0.88)], 20);
        let item = &items[0];
        assert_eq!(item.item, "Sunscreen");
        assert_eq!(item.category, "clothing");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.importance, Importance::High);
        assert_eq!(item.tags, vec!["a"]);
        assert!((item.score - 0.88).abs() < 1e-6);
    }
}
