//! The validated output model — packing items, the five fixed category
//! buckets, and the outcome returned to the caller.
//!
//! Invariants live here so both the response validator and the deterministic
//! fallback construct output through the same checks: item names and reasons
//! are non-blank, quantities lie in [1,50], and the total item count across
//! all buckets lies in [`PackingCategories::MIN_TOTAL_ITEMS`,
//! [`PackingCategories::MAX_TOTAL_ITEMS`]].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// A violation detected while constructing a single [`PackingItem`].
#[derive(Debug, Clone, Error)]
pub enum ItemViolation {
    #[error("blank item name")]
    BlankName,

    #[error("blank reason for \"{item}\"")]
    BlankReason { item: String },

    #[error("quantity {quantity} out of range (1-50) for \"{item}\"")]
    QuantityOutOfRange { item: String, quantity: i64 },
}

/// A single item on the packing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingItem {
    /// What to pack, e.g. "Sunscreen".
    pub name: String,

    /// How many to pack (1–50).
    pub quantity: u32,

    /// Why it belongs on the list.
    pub reason: String,
}

impl PackingItem {
    /// Maximum quantity of any single item.
    pub const MAX_QUANTITY: i64 = 50;

    /// Create a validated item. All structural rules are enforced here.
    pub fn new(
        name: impl Into<String>,
        quantity: i64,
        reason: impl Into<String>,
    ) -> std::result::Result<Self, ItemViolation> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ItemViolation::BlankName);
        }

        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(ItemViolation::BlankReason { item: name });
        }

        if quantity < 1 || quantity > Self::MAX_QUANTITY {
            return Err(ItemViolation::QuantityOutOfRange { item: name, quantity });
        }

        Ok(Self {
            name,
            quantity: quantity as u32,
            reason,
        })
    }
}

/// The five fixed category buckets of a packing list.
///
/// The bucket set is part of the output contract — generators must fill
/// exactly these five, though any bucket may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingCategories {
    #[serde(default)]
    pub clothing: Vec<PackingItem>,
    #[serde(default)]
    pub tech: Vec<PackingItem>,
    #[serde(default)]
    pub hygiene: Vec<PackingItem>,
    #[serde(default)]
    pub documents: Vec<PackingItem>,
    #[serde(default)]
    pub other: Vec<PackingItem>,
}

impl PackingCategories {
    /// Minimum total item count across all buckets.
    pub const MIN_TOTAL_ITEMS: usize = 3;
    /// Maximum total item count across all buckets.
    pub const MAX_TOTAL_ITEMS: usize = 100;

    /// The bucket names, in canonical order.
    pub const CATEGORY_NAMES: [&'static str; 5] =
        ["clothing", "tech", "hygiene", "documents", "other"];

    /// Total number of items across all five buckets.
    pub fn total_items(&self) -> usize {
        self.clothing.len()
            + self.tech.len()
            + self.hygiene.len()
            + self.documents.len()
            + self.other.len()
    }

    /// Iterate over every item regardless of bucket.
    pub fn iter_all(&self) -> impl Iterator<Item = &PackingItem> {
        self.clothing
            .iter()
            .chain(self.tech.iter())
            .chain(self.hygiene.iter())
            .chain(self.documents.iter())
            .chain(self.other.iter())
    }

    /// Check the aggregate invariant: total item count in [3,100].
    ///
    /// Per-item rules are enforced at [`PackingItem::new`]; this collects the
    /// remaining aggregate violations so callers can surface all of them.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut violations = Vec::new();
        let total = self.total_items();

        if total < Self::MIN_TOTAL_ITEMS {
            violations.push(format!(
                "too few items: {total} (minimum {})",
                Self::MIN_TOTAL_ITEMS
            ));
        }
        if total > Self::MAX_TOTAL_ITEMS {
            violations.push(format!(
                "too many items: {total} (maximum {})",
                Self::MAX_TOTAL_ITEMS
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::SchemaViolations { violations })
        }
    }
}

/// Where the returned list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Generated by the chat model and validated.
    Ai,
    /// Produced by the deterministic fallback generator.
    Fallback,
}

/// Per-stage wall-clock durations, recorded for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub retrieve_ms: u64,
    pub context_ms: u64,
    pub prompt_ms: u64,
    pub generate_ms: u64,
    pub validate_ms: u64,
}

impl StageTimings {
    /// Sum of all recorded stage durations.
    pub fn total_ms(&self) -> u64 {
        self.retrieve_ms + self.context_ms + self.prompt_ms + self.generate_ms + self.validate_ms
    }
}

/// The result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// The validated packing list.
    pub categories: PackingCategories,

    /// Whether the list is AI-sourced or fallback-sourced.
    pub provenance: Provenance,

    /// Per-stage durations for this request.
    pub timings: StageTimings,
}
