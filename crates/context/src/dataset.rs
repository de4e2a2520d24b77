//! Dataset file formats and loading for the context tables.
//!
//! All three datasets are flat JSON files read once at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use packwise_core::context::{CultureTip, WeatherInfo};
use packwise_core::error::Error;
use packwise_core::request::Season;

use crate::normalize_location;

/// One row of the weather dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub location: String,
    pub season: Season,
    #[serde(flatten)]
    pub info: WeatherInfo,
}

/// One row of the culture-tips dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipRecord {
    pub location: String,
    #[serde(flatten)]
    pub tip: CultureTip,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T, Error> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read {what} file {}: {e}", path.display()),
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Load the weather dataset.
pub fn load_weather_file(path: &Path) -> Result<Vec<WeatherRecord>, Error> {
    read_json(path, "weather dataset")
}

/// Load the culture-tips dataset.
pub fn load_tips_file(path: &Path) -> Result<Vec<TipRecord>, Error> {
    read_json(path, "culture tips dataset")
}

/// The set of destinations the host surface accepts.
///
/// An empty whitelist allows every destination — the core degrades
/// gracefully on unknown ones, so whitelisting is purely input hygiene.
pub struct DestinationWhitelist {
    destinations: HashSet<String>,
}

impl DestinationWhitelist {
    /// Build from a list of destination names.
    pub fn new(destinations: impl IntoIterator<Item = String>) -> Self {
        Self {
            destinations: destinations
                .into_iter()
                .map(|d| normalize_location(&d))
                .collect(),
        }
    }

    /// An empty whitelist (allows everything).
    pub fn allow_all() -> Self {
        Self {
            destinations: HashSet::new(),
        }
    }

    /// Load from a JSON list of destination names.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let names: Vec<String> = read_json(path, "destination whitelist")?;
        Ok(Self::new(names))
    }

    /// Whether the destination is accepted.
    pub fn allows(&self, destination: &str) -> bool {
        self.destinations.is_empty()
            || self.destinations.contains(&normalize_location(destination))
    }

    /// Number of whitelisted destinations (0 = allow all).
    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Whether the whitelist is empty (allow-all mode).
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}
