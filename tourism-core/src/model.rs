use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Deserialize;

/// One ranked candidate returned by the geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCandidate {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

/// The single candidate chosen by the disambiguation policy.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

impl GeoResult {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Current conditions at a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub temperature_unit: String,
    pub precipitation_probability_pct: u8,
    /// Provider-local observation time, when reported.
    pub observed_at: Option<NaiveDateTime>,
}

/// What the user asked for. At least one flag is always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub weather: bool,
    pub places: bool,
}

/// A raw tagged entity (node, way or relation) from the points-of-interest provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoiElement {
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl PoiElement {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Country from `addr:country`, else the last comma-separated segment of `is_in`.
    pub fn country(&self) -> Option<&str> {
        if let Some(country) = self.tag("addr:country").filter(|c| !c.is_empty()) {
            return Some(country);
        }

        self.tag("is_in")
            .filter(|is_in| !is_in.is_empty())
            .and_then(|is_in| is_in.rsplit(',').next())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// A named element that survived filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Attraction {
    pub name: String,
    pub tag_count: usize,
    pub tourism: Option<String>,
}
