//! Context gathering for Packwise — static weather and cultural-tip lookup
//! for a destination, plus the destination whitelist.
//!
//! The lookup tables are immutable maps built once during explicit process
//! initialization and injected where needed; after startup they are
//! read-only and need no synchronization. Absence of a match is not an
//! error — callers receive `None`/empty and downstream prompt wording
//! adapts.

pub mod dataset;

pub use dataset::{DestinationWhitelist, TipRecord, WeatherRecord};

use std::collections::HashMap;
use std::path::Path;

use packwise_core::context::{ContextBundle, CultureTip, WeatherInfo};
use packwise_core::error::Error;
use packwise_core::request::{Season, TravelRequest};
use tracing::info;

/// Normalize a location for lookup: title-case each whitespace-separated
/// token. "new york" and "NEW YORK" both resolve to "New York".
pub fn normalize_location(raw: &str) -> String {
    raw.split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Immutable destination context: weather keyed by (location, season) and
/// culture tips keyed by location.
pub struct ContextGatherer {
    weather: HashMap<(String, Season), WeatherInfo>,
    tips: HashMap<String, Vec<CultureTip>>,
}

impl ContextGatherer {
    /// Build the gatherer from in-memory records.
    pub fn from_records(weather: Vec<WeatherRecord>, tips: Vec<TipRecord>) -> Self {
        let weather = weather
            .into_iter()
            .map(|record| {
                (
                    (normalize_location(&record.location), record.season),
                    record.info,
                )
            })
            .collect();

        let mut tip_map: HashMap<String, Vec<CultureTip>> = HashMap::new();
        for record in tips {
            tip_map
                .entry(normalize_location(&record.location))
                .or_default()
                .push(record.tip);
        }

        Self {
            weather,
            tips: tip_map,
        }
    }

    /// Load both datasets from their JSON files.
    pub fn from_files(weather_path: &Path, culture_path: &Path) -> Result<Self, Error> {
        let weather = dataset::load_weather_file(weather_path)?;
        let tips = dataset::load_tips_file(culture_path)?;

        info!(
            weather_entries = weather.len(),
            tip_entries = tips.len(),
            "Context datasets loaded"
        );

        Ok(Self::from_records(weather, tips))
    }

    /// Typical weather for a destination in a season, if known.
    pub fn weather(&self, location: &str, season: Season) -> Option<WeatherInfo> {
        self.weather
            .get(&(normalize_location(location), season))
            .cloned()
    }

    /// Cultural tips for a destination, possibly empty.
    pub fn culture_tips(&self, location: &str) -> Vec<CultureTip> {
        self.tips
            .get(&normalize_location(location))
            .cloned()
            .unwrap_or_default()
    }

    /// Gather everything the prompt needs for one request.
    pub fn gather(&self, request: &TravelRequest) -> ContextBundle {
        ContextBundle {
            weather: self.weather(&request.destination, request.season),
            tips: self.culture_tips(&request.destination),
        }
    }
}
