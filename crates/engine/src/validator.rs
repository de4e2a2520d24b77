//! Structured-output validation — turn raw model text into a
//! [`PackingCategories`] or fail with everything that is wrong with it.
//!
//! Models wrap JSON in markdown fences and occasionally in prose; both are
//! stripped before parsing. Structural rules are enforced at item
//! construction, business rules on the aggregate, and all violations are
//! collected into a single error — never fail-fast on the first.

use serde::Deserialize;

use packwise_core::error::ValidationError;
use packwise_core::packing::{PackingCategories, PackingItem};

/// Parse and validate a raw model response.
pub fn parse(raw: &str) -> Result<PackingCategories, ValidationError> {
    let json = extract_json(raw)
        .ok_or_else(|| ValidationError::InvalidJson("no JSON object found in response".into()))?;

    let parsed: RawResponse =
        serde_json::from_str(json).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

    let raw_categories = parsed.categories;
    let mut violations = Vec::new();

    // Aggregate rules run on what the model actually emitted, so a response
    // that is both too small and malformed reports both problems.
    let raw_total = raw_categories.total_items();
    if raw_total < PackingCategories::MIN_TOTAL_ITEMS {
        violations.push(format!(
            "too few items: {raw_total} (minimum {})",
            PackingCategories::MIN_TOTAL_ITEMS
        ));
    }
    if raw_total > PackingCategories::MAX_TOTAL_ITEMS {
        violations.push(format!(
            "too many items: {raw_total} (maximum {})",
            PackingCategories::MAX_TOTAL_ITEMS
        ));
    }

    let categories = PackingCategories {
        clothing: build_bucket("clothing", raw_categories.clothing, &mut violations),
        tech: build_bucket("tech", raw_categories.tech, &mut violations),
        hygiene: build_bucket("hygiene", raw_categories.hygiene, &mut violations),
        documents: build_bucket("documents", raw_categories.documents, &mut violations),
        other: build_bucket("other", raw_categories.other, &mut violations),
    };

    if violations.is_empty() {
        Ok(categories)
    } else {
        Err(ValidationError::SchemaViolations { violations })
    }
}

/// Construct one bucket, collecting per-item violations instead of stopping.
fn build_bucket(
    category: &str,
    raw_items: Vec<RawItem>,
    violations: &mut Vec<String>,
) -> Vec<PackingItem> {
    raw_items
        .into_iter()
        .filter_map(|raw| match PackingItem::new(raw.item, raw.quantity, raw.reason) {
            Ok(item) => Some(item),
            Err(violation) => {
                violations.push(format!("{category}: {violation}"));
                None
            }
        })
        .collect()
}

/// Strip markdown code fences and surrounding prose, returning the slice
/// from the first `{` to the last `}`.
fn extract_json(raw: &str) -> Option<&str> {
    let mut text = raw.trim();

    // Drop a leading ``` or ```json fence line and a trailing ``` line.
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.trim_start_matches(['\r', '\n']);
        if let Some(stripped) = text.trim_end().strip_suffix("```") {
            text = stripped;
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

// --- Raw response shape (internal) ---

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    categories: RawCategories,
}

#[derive(Debug, Default, Deserialize)]
struct RawCategories {
    #[serde(default)]
    clothing: Vec<RawItem>,
    #[serde(default)]
    tech: Vec<RawItem>,
    #[serde(default)]
    hygiene: Vec<RawItem>,
    #[serde(default)]
    documents: Vec<RawItem>,
    #[serde(default)]
    other: Vec<RawItem>,
}

impl RawCategories {
    fn total_items(&self) -> usize {
        self.clothing.len()
            + self.tech.len()
            + self.hygiene.len()
            + self.documents.len()
            + self.other.len()
    }
}

/// One item as emitted by the model. Fields default so that shape problems
/// surface as construction violations rather than opaque parse errors.
#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default)]
    item: String,
    #[serde(default)]
    quantity: i64,
    #[serde(default)]
    reason: String,
}
