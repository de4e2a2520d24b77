//! Travel request — the immutable input to the generation pipeline.
//!
//! Created by the caller, owned by the request scope, dropped when the call
//! returns. Construction validates the duration and destination so every
//! downstream component can assume a well-formed request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RequestError;

/// The kind of trip being packed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelType {
    Business,
    Vacation,
    Backpacking,
}

impl TravelType {
    /// Wire form, as used in requests and knowledge-base payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "BUSINESS",
            Self::Vacation => "VACATION",
            Self::Backpacking => "BACKPACKING",
        }
    }

    /// Lower-case form used in vector-store payload filters.
    pub fn filter_value(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Vacation => "vacation",
            Self::Backpacking => "backpacking",
        }
    }
}

impl fmt::Display for TravelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUSINESS" => Ok(Self::Business),
            "VACATION" => Ok(Self::Vacation),
            "BACKPACKING" => Ok(Self::Backpacking),
            other => Err(format!("unknown travel type: {other}")),
        }
    }
}

/// The season the trip falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Wire form, as used in requests and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
            Self::Winter => "WINTER",
        }
    }

    /// Lower-case form used in vector-store payload filters.
    pub fn filter_value(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SPRING" => Ok(Self::Spring),
            "SUMMER" => Ok(Self::Summer),
            "FALL" | "AUTUMN" => Ok(Self::Fall),
            "WINTER" => Ok(Self::Winter),
            other => Err(format!("unknown season: {other}")),
        }
    }
}

/// A single packing-list request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    /// Destination city or region, e.g. "Dubai".
    pub destination: String,

    /// Trip length in days (1–365).
    pub duration_days: u32,

    /// The kind of trip.
    pub travel_type: TravelType,

    /// The season the trip falls in.
    pub season: Season,

    /// Departure date, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_date: Option<NaiveDate>,
}

impl TravelRequest {
    /// Maximum supported trip length in days.
    pub const MAX_DURATION_DAYS: u32 = 365;

    /// Create a validated request.
    pub fn new(
        destination: impl Into<String>,
        duration_days: u32,
        travel_type: TravelType,
        season: Season,
    ) -> std::result::Result<Self, RequestError> {
        let destination = destination.into();
        if destination.trim().is_empty() {
            return Err(RequestError::BlankDestination);
        }
        if duration_days == 0 || duration_days > Self::MAX_DURATION_DAYS {
            return Err(RequestError::InvalidDuration(duration_days));
        }

        Ok(Self {
            destination,
            duration_days,
            travel_type,
            season,
            travel_date: None,
        })
    }

    /// Attach a departure date.
    pub fn with_travel_date(mut self, date: NaiveDate) -> Self {
        self.travel_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_request_constructs() {
        let req = TravelRequest::new("Dubai", 5, TravelType::Business, Season::Summer).unwrap();
        assert_eq!(req.destination, "Dubai");
        assert_eq!(req.duration_days, 5);
        assert!(req.travel_date.is_none());
    }

    #[test]
    fn blank_destination_rejected() {
        let err = TravelRequest::new("   ", 5, TravelType::Vacation, Season::Spring).unwrap_err();
        assert!(matches!(err, RequestError::BlankDestination));
    }

    #[test]
    fn zero_duration_rejected() {
        let err = TravelRequest::new("Oslo", 0, TravelType::Vacation, Season::Winter).unwrap_err();
        assert!(matches!(err, RequestError::InvalidDuration(0)));
    }

    #[test]
    fn duration_over_a_year_rejected() {
        let err =
            TravelRequest::new("Oslo", 366, TravelType::Backpacking, Season::Fall).unwrap_err();
        assert!(matches!(err, RequestError::InvalidDuration(366)));
    }

    #[test]
    fn boundary_durations_accepted() {
        assert!(TravelRequest::new("Oslo", 1, TravelType::Vacation, Season::Winter).is_ok());
        assert!(TravelRequest::new("Oslo", 365, TravelType::Vacation, Season::Winter).is_ok());
    }

    #[test]
    fn enums_serialize_uppercase() {
        let req = TravelRequest::new("Dubai", 5, TravelType::Business, Season::Summer).unwrap();
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"BUSINESS\""));
        assert!(json.contains("\"SUMMER\""));
    }

    #[test]
    fn enums_parse_case_insensitively() {
        assert_eq!("business".parse::<TravelType>().unwrap(), TravelType::Business);
        assert_eq!("autumn".parse::<Season>().unwrap(), Season::Fall);
        assert!("cruise".parse::<TravelType>().is_err());
    }

    #[test]
    fn travel_date_roundtrips() {
        let req = TravelRequest::new("Dubai", 5, TravelType::Business, Season::Summer)
            .unwrap()
            .with_travel_date(NaiveDate::from_ymd_opt(2026, 7, 14).unwrap());
        let json = serde_json::to_string(&req).unwrap();
        let parsed: TravelRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, req);
    }
}
