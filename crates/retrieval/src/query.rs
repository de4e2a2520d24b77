//! Query-text construction for similarity search.
//!
//! The query is a natural-language sentence built from the request,
//! augmented with fixed travel-type and season keywords. The keywords pull
//! the query embedding toward the vocabulary the knowledge base was embedded
//! with, which measurably improves match relevance.

use packwise_core::request::{Season, TravelRequest, TravelType};

/// Fixed keywords appended per travel type.
fn travel_type_keywords(travel_type: TravelType) -> &'static str {
    match travel_type {
        TravelType::Business => "professional meetings, formal attire, business essentials",
        TravelType::Vacation => "leisure activities, sightseeing, comfortable clothing",
        TravelType::Backpacking => "lightweight gear, outdoor activities, minimal packing",
    }
}

/// Fixed keywords appended per season.
fn season_keywords(season: Season) -> &'static str {
    match season {
        Season::Spring => "mild weather, layering, rain protection",
        Season::Summer => "sun protection, light clothing, warm weather",
        Season::Fall => "cool weather, layering, variable conditions",
        Season::Winter => "cold weather, warm layers, insulation",
    }
}

/// Build the retrieval query text for a request. Deterministic.
pub fn build_query(request: &TravelRequest) -> String {
    format!(
        "Packing items for a {}-day {} trip to {} in {}. Needs: {}. Conditions: {}.",
        request.duration_days,
        request.travel_type.filter_value(),
        request.destination,
        request.season.filter_value(),
        travel_type_keywords(request.travel_type),
        season_keywords(request.season),
    )
}
