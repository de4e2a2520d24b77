//! Contextual enrichment types — static weather data and cultural tips for a
//! destination.
//!
//! Absence is the normal case here: a destination without weather data or
//! tips yields `None`/empty, and the prompt wording adapts downstream.

use serde::{Deserialize, Serialize};

/// Typical weather for a destination in a given season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    /// Typical low, °C.
    pub temp_min: f32,

    /// Typical high, °C.
    pub temp_max: f32,

    /// Human-readable conditions, e.g. "Hot and sunny".
    pub conditions: String,

    /// Typical relative humidity, percent.
    pub humidity: u32,

    /// Chance of precipitation, percent.
    pub precipitation_chance: u32,
}

/// How strongly a cultural tip should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TipImportance {
    High,
    Medium,
    Low,
}

/// A cultural note relevant to packing, e.g. dress codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureTip {
    /// Tip category, e.g. "dress" or "etiquette".
    pub category: String,

    /// The tip itself.
    pub text: String,

    /// How strongly to surface it.
    pub importance: TipImportance,
}

/// Everything the context stage gathered for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    /// Weather for (destination, season), if known.
    pub weather: Option<WeatherInfo>,

    /// Cultural tips for the destination, possibly empty.
    #[serde(default)]
    pub tips: Vec<CultureTip>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_importance_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&TipImportance::High).unwrap(),
            "\"HIGH\""
        );
    }

    #[test]
    fn empty_bundle_is_default() {
        let bundle = ContextBundle::default();
        assert!(bundle.weather.is_none());
        assert!(bundle.tips.is_empty());
    }

    #[test]
    fn weather_roundtrips() {
        let weather = WeatherInfo {
            temp_min: 30.0,
            temp_max: 45.0,
            conditions: "Hot and sunny".into(),
            humidity: 60,
            precipitation_chance: 5,
        };
        let json = serde_json::to_string(&weather).unwrap();
        let parsed: WeatherInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, weather);
    }
}
