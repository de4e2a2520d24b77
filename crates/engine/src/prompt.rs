//! Prompt construction — pure, deterministic, snapshot-testable.
//!
//! The system prompt branches on whether retrieval produced anything: with
//! retrieved items the model is told to treat them as the authoritative
//! source; without, it falls back to conservative generic guidance. Both
//! branches pin the same output contract and anti-hallucination rules.
//!
//! The user prompt has a fixed section order: trip facts, weather, culture
//! tips, retrieved items, travel-type guidance. Optional sections are
//! omitted entirely rather than left as empty headers.

use std::collections::BTreeMap;
use std::fmt::Write;

use packwise_core::context::{ContextBundle, TipImportance};
use packwise_core::provider::PromptPayload;
use packwise_core::request::{TravelRequest, TravelType};
use packwise_core::retrieval::RetrievedItem;

/// The output contract shared by both system-prompt branches.
const OUTPUT_CONTRACT: &str = "\
Respond with exactly one JSON object and no surrounding prose, of the form:
{\"categories\": {\"clothing\": [...], \"tech\": [...], \"hygiene\": [...], \"documents\": [...], \"other\": [...]}}
Every item has the shape {\"item\": string, \"quantity\": integer, \"reason\": string}.
Fill exactly these five categories; a category may be an empty list.
The total item count must be between 3 and 100, and every quantity between 1 and 50.
Never invent fictitious products, never suggest dangerous or prohibited items, and \
never over-provision quantities beyond what the trip plausibly needs.";

/// Build the prompt pair for one request. Pure function; no I/O.
pub fn build(
    request: &TravelRequest,
    context: &ContextBundle,
    items: &[RetrievedItem],
) -> PromptPayload {
    PromptPayload {
        system: build_system(items),
        user: build_user(request, context, items),
    }
}

fn build_system(items: &[RetrievedItem]) -> String {
    let strategy = if items.is_empty() {
        "No knowledge-base matches are available for this trip. Generate a conservative, \
         broadly applicable packing list from general travel knowledge, favoring widely \
         useful items over specialized gear."
    } else {
        "The RETRIEVED ITEMS in the user message come from a verified packing knowledge \
         base. Treat them as the primary, authoritative source: prioritize retrieved items \
         over your own suggestions, never duplicate an item that was retrieved, and add \
         only complementary items that address genuine gaps."
    };

    format!("You are an expert travel packing assistant.\n\n{strategy}\n\n{OUTPUT_CONTRACT}")
}

fn build_user(request: &TravelRequest, context: &ContextBundle, items: &[RetrievedItem]) -> String {
    let mut out = String::new();

    // Trip facts — always present.
    out.push_str("TRIP\n");
    let _ = writeln!(out, "Destination: {}", request.destination);
    let _ = writeln!(out, "Duration: {} days", request.duration_days);
    let _ = writeln!(out, "Travel type: {}", request.travel_type);
    let _ = writeln!(out, "Season: {}", request.season);
    if let Some(date) = request.travel_date {
        let _ = writeln!(out, "Travel date: {date}");
    }

    // Weather — present with data or with the explicit no-data wording.
    out.push_str("\nWEATHER\n");
    match &context.weather {
        Some(weather) => {
            let _ = writeln!(
                out,
                "{}, {:.0}-{:.0}°C, humidity {}%, precipitation chance {}%",
                weather.conditions,
                weather.temp_min,
                weather.temp_max,
                weather.humidity,
                weather.precipitation_chance,
            );
        }
        None => {
            let _ = writeln!(
                out,
                "No specific weather data available; use general seasonal guidance for {}.",
                request.season
            );
        }
    }

    // Culture tips — omitted entirely when there are none.
    if !context.tips.is_empty() {
        out.push_str("\nCULTURE TIPS\n");
        for tip in &context.tips {
            let _ = writeln!(
                out,
                "{} ({}) {}",
                importance_marker(tip.importance),
                tip.category,
                tip.text
            );
        }
    }

    // Retrieved items — grouped by category, best matches first.
    if !items.is_empty() {
        out.push_str("\nRETRIEVED ITEMS (verified knowledge base)\n");

        let mut by_category: BTreeMap<&str, Vec<&RetrievedItem>> = BTreeMap::new();
        for item in items {
            by_category.entry(item.category.as_str()).or_default().push(item);
        }

        for (category, mut group) in by_category {
            group.sort_by(|a, b| {
                b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal)
            });

            let _ = writeln!(out, "{category}:");
            for item in group {
                let _ = write!(
                    out,
                    "  - {} x{} — {} (confidence {}%)",
                    item.item,
                    item.quantity,
                    item.reason,
                    (item.score * 100.0).round() as u32,
                );
                if item.tags.is_empty() {
                    out.push('\n');
                } else {
                    let _ = writeln!(out, " [tags: {}]", item.tags.join(", "));
                }
            }
        }
    }

    // Travel-type guidance — always present, fixed three-way lookup.
    out.push_str("\nGUIDANCE\n");
    out.push_str(travel_type_guidance(request.travel_type));
    out.push('\n');

    out
}

/// Visual marker per tip importance.
fn importance_marker(importance: TipImportance) -> &'static str {
    match importance {
        TipImportance::High => "[!]",
        TipImportance::Medium => "[~]",
        TipImportance::Low => "[-]",
    }
}

/// Fixed guidance per travel type.
fn travel_type_guidance(travel_type: TravelType) -> &'static str {
    match travel_type {
        TravelType::Business => {
            "Prioritize professional attire, meeting essentials, and garment care. \
             Keep casual items to a minimum."
        }
        TravelType::Vacation => {
            "Balance comfort and versatility for sightseeing and leisure. \
             Cover both daytime activity and evening options as the season requires."
        }
        TravelType::Backpacking => {
            "Minimize weight and bulk. Favor quick-dry, multi-purpose gear and the \
             essentials of self-sufficiency."
        }
    }
}
