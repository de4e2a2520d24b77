//! Retrieval-side types — knowledge-base entries and the ranked items a
//! similarity search returns.
//!
//! [`RetrievedItem`]s are ephemeral: produced fresh per request, consumed by
//! the prompt builder, never persisted. [`KnowledgeEntry`] is the row shape
//! of the curated knowledge file used by ingestion.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a knowledge-base item, as curated upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

impl Importance {
    /// Rank for sorting, highest first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// A pre-verified packing item returned by similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedItem {
    /// Item name, e.g. "Sunscreen SPF 50".
    pub item: String,

    /// One of the five packing categories.
    pub category: String,

    /// Recommended quantity.
    pub quantity: u32,

    /// Why the knowledge base recommends it.
    pub reason: String,

    /// Similarity score in [0,1]; results arrive pre-filtered to the
    /// configured minimum, so downstream code never re-filters.
    pub score: f32,

    /// Curated importance.
    pub importance: Importance,

    /// Ordered tags, possibly empty.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A row of the curated packing knowledge file, used by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub item: String,
    pub category: String,
    pub destination_type: String,
    pub travel_type: String,
    pub seasons: Vec<String>,
    pub quantity: u32,
    pub reason: String,
    pub importance: Importance,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub climate: Vec<String>,
}

impl KnowledgeEntry {
    /// The rich text representation handed to the embedding model.
    ///
    /// One field per line; this is the exact shape the knowledge base was
    /// embedded with, so query and corpus vectors live in the same space.
    pub fn embedding_text(&self) -> String {
        format!(
            "Item: {}\nCategory: {}\nTravel Type: {}\nDestination: {}\nSeason: {}\nReason: {}\nTags: {}\nClimate: {}\nImportance: {}",
            self.item,
            self.category,
            self.travel_type,
            self.destination_type,
            self.seasons.join(", "),
            self.reason,
            self.tags.join(", "),
            self.climate.join(", "),
            self.importance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn importance_rank_ordering() {
        assert!(Importance::Critical.rank() > Importance::High.rank());
        assert!(Importance::High.rank() > Importance::Medium.rank());
        assert!(Importance::Medium.rank() > Importance::Low.rank());
    }

    #[test]
    fn importance_deserializes_lowercase() {
        let imp: Importance = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(imp, Importance::Critical);
    }

    #[test]
    fn retrieved_item_tags_default_empty() {
        let json = r#"{
            "item": "Sunscreen",
            "category": "hygiene",
            "quantity": 1,
            "reason": "sun protection",
            "score": 0.91,
            "importance": "high"
        }"#;
        let item: RetrievedItem = serde_json::from_str(json).unwrap();
        assert!(item.tags.is_empty());
        assert!((item.score - 0.91).abs() < 1e-6);
    }

    #[test]
    fn embedding_text_is_field_per_line() {
        let entry = KnowledgeEntry {
            item: "Sunscreen SPF 50".into(),
            category: "hygiene".into(),
            destination_type: "beach".into(),
            travel_type: "vacation".into(),
            seasons: vec!["summer".into(), "all".into()],
            quantity: 1,
            reason: "Protects against strong sun".into(),
            importance: Importance::High,
            tags: vec!["sun".into(), "skincare".into()],
            climate: vec!["hot".into()],
        };

        let text = entry.embedding_text();
        assert!(text.starts_with("Item: Sunscreen SPF 50\n"));
        assert!(text.contains("Season: summer, all"));
        assert!(text.contains("Tags: sun, skincare"));
        assert!(text.ends_with("Importance: high"));
        assert_eq!(text.lines().count(), 9);
    }
}
