//! Minimal Qdrant REST client — similarity search, point upsert, and a
//! collection probe. Only the slice of the API this service uses.

use packwise_core::error::RetrievalError;
use packwise_core::retrieval::Importance;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A Qdrant collection client.
pub struct QdrantClient {
    base_url: String,
    collection: String,
    client: reqwest::Client,
}

impl QdrantClient {
    /// Create a client for one collection.
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            client,
        }
    }

    /// The collection this client talks to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Similarity search, pre-filtered on the store side.
    ///
    /// Filter semantics: `travel_type` exact match AND `season` any-of
    /// {requested season, "all"}. Points below `score_threshold` never leave
    /// the store.
    pub async fn search_points(
        &self,
        vector: &[f32],
        limit: usize,
        score_threshold: f32,
        travel_type: &str,
        season: &str,
    ) -> Result<Vec<ScoredPoint>, RetrievalError> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );

        let body = SearchRequest {
            vector: vector.to_vec(),
            limit,
            score_threshold,
            filter: Filter {
                must: vec![
                    Condition {
                        key: "travel_type".into(),
                        r#match: Match::Value {
                            value: travel_type.into(),
                        },
                    },
                    Condition {
                        key: "season".into(),
                        r#match: Match::Any {
                            any: vec![season.into(), "all".into()],
                        },
                    },
                ],
            },
            with_payload: true,
        };

        debug!(collection = %self.collection, limit, score_threshold, "Searching vector store");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Store { status, message });
        }

        let search: SearchResponse = response.json().await.map_err(|e| {
            RetrievalError::Malformed(format!("Failed to parse search response: {e}"))
        })?;

        Ok(search.result)
    }

    /// Upsert points into the collection (ingestion path).
    pub async fn upsert_points(&self, points: Vec<Point>) -> Result<(), RetrievalError> {
        let url = format!("{}/collections/{}/points", self.base_url, self.collection);
        let body = UpsertRequest { points };

        let response = self
            .client
            .put(&url)
            .query(&[("wait", "true")])
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        if status != 200 {
            let message = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Store { status, message });
        }

        Ok(())
    }

    /// Probe the collection — used by health checks and `doctor`.
    pub async fn collection_exists(&self) -> Result<bool, RetrievalError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        Ok(response.status().is_success())
    }
}

fn transport_error(e: reqwest::Error) -> RetrievalError {
    if e.is_timeout() {
        RetrievalError::Timeout(e.to_string())
    } else {
        RetrievalError::Network(e.to_string())
    }
}

// --- Wire types ---

#[derive(Debug, Serialize)]
struct SearchRequest {
    vector: Vec<f32>,
    limit: usize,
    score_threshold: f32,
    filter: Filter,
    with_payload: bool,
}

#[derive(Debug, Serialize)]
struct Filter {
    must: Vec<Condition>,
}

#[derive(Debug, Serialize)]
struct Condition {
    key: String,
    r#match: Match,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Match {
    Value { value: String },
    Any { any: Vec<String> },
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

/// One search hit with its payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoredPoint {
    pub id: serde_json::Value,
    pub score: f32,
    pub payload: PointPayload,
}

/// The knowledge-base payload stored with each point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointPayload {
    pub item: String,
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub reason: String,
    #[serde(default = "default_importance")]
    pub importance: Importance,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub destination_type: String,
    #[serde(default)]
    pub travel_type: String,
    #[serde(default)]
    pub season: Vec<String>,
    #[serde(default)]
    pub climate: Vec<String>,
}

fn default_quantity() -> u32 {
    1
}
fn default_importance() -> Importance {
    Importance::Medium
}

/// A point to upsert.
#[derive(Debug, Serialize)]
pub struct Point {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    points: Vec<Point>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_serializes_filter_semantics() {
        let body = SearchRequest {
            vector: vec![0.1, 0.2],
            limit: 20,
            score_threshold: 0.4,
            filter: Filter {
                must: vec![
                    Condition {
                        key: "travel_type".into(),
                        r#match: Match::Value {
                            value: "business".into(),
                        },
                    },
                    Condition {
                        key: "season".into(),
                        r#match: Match::Any {
                            any: vec!["summer".into(), "all".into()],
                        },
                    },
                ],
            },
            with_payload: true,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["limit"], 20);
        assert_eq!(json["with_payload"], true);
        assert_eq!(json["filter"]["must"][0]["key"], "travel_type");
        assert_eq!(json["filter"]["must"][0]["match"]["value"], "business");
        assert_eq!(json["filter"]["must"][1]["match"]["any"][0], "summer");
        assert_eq!(json["filter"]["must"][1]["match"]["any"][1], "all");
    }

    #[test]
    fn parse_search_response() {
        let data = r#"{
            "result": [
                {
                    "id": "0de7d133-4d39-4a41-bd07-bd12b4f0a38c",
                    "score": 0.87,
                    "payload": {
                        "item": "Sunscreen SPF 50",
                        "category": "hygiene",
                        "quantity": 1,
                        "reason": "Protects against strong sun",
                        "importance": "high",
                        "tags": ["sun", "skincare"],
                        "travel_type": "vacation",
                        "season": ["summer", "all"]
                    }
                }
            ],
            "status": "ok",
            "time": 0.002
        }"#;
        let parsed: SearchResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.result.len(), 1);
        let point = &parsed.result[0];
        assert!((point.score - 0.87).abs() < 1e-6);
        assert_eq!(point.payload.item, "Sunscreen SPF 50");
        assert_eq!(point.payload.tags, vec!["sun", "skincare"]);
    }

    #[test]
    fn parse_sparse_payload_uses_defaults() {
        let data = r#"{
            "result": [
                {"id": 7, "score": 0.5, "payload": {"item": "Socks", "category": "clothing"}}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(data).unwrap();
        let payload = &parsed.result[0].payload;
        assert_eq!(payload.quantity, 1);
        assert_eq!(payload.importance, Importance::Medium);
        assert!(payload.tags.is_empty());
    }

    #[test]
    fn parse_empty_result() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"result": []}"#).unwrap();
        assert!(parsed.result.is_empty());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = QdrantClient::new("http://localhost:6333/", "packing_items", Duration::from_secs(10));
        assert_eq!(client.base_url, "http://localhost:6333");
        assert_eq!(client.collection(), "packing_items");
    }
}
