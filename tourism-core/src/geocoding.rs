//! Place-name resolution with a country-aware disambiguation policy.
//!
//! Without a country or a well-known foreign city in the query, candidates
//! located in India are preferred over the provider's top-ranked one.

use tracing::{debug, warn};

use crate::{GeoCandidate, GeoResult, provider::GeocodingProvider};

/// How many ranked candidates to request per lookup.
pub const CANDIDATE_LIMIT: usize = 10;

pub const UNKNOWN_COUNTRY: &str = "Unknown";

const PREFERRED_COUNTRY: &str = "india";

/// Country names and aliases that pin a query to the top-ranked candidate.
const COUNTRY_HINTS: &[&str] = &[
    "india",
    "usa",
    "united states",
    "uk",
    "united kingdom",
    "france",
    "germany",
    "japan",
    "china",
    "australia",
    "canada",
    "spain",
    "italy",
    "uae",
    "united arab emirates",
    "dubai",
    "abu dhabi",
];

/// Well-known cities outside India that should not be biased towards India.
const INTERNATIONAL_CITIES: &[&str] = &[
    "dubai",
    "london",
    "paris",
    "new york",
    "tokyo",
    "sydney",
    "singapore",
    "bangkok",
    "hong kong",
    "istanbul",
    "rome",
    "barcelona",
    "amsterdam",
    "berlin",
    "moscow",
    "cairo",
    "riyadh",
    "doha",
    "kuwait",
    "manama",
];

fn has_disambiguating_context(place_name: &str) -> bool {
    let lower = place_name.to_lowercase();
    COUNTRY_HINTS.iter().any(|hint| lower.contains(hint))
        || INTERNATIONAL_CITIES.iter().any(|city| lower.contains(city))
}

/// Pick one candidate out of the provider's ranked list.
pub fn select_candidate<'a>(
    place_name: &str,
    candidates: &'a [GeoCandidate],
) -> Option<&'a GeoCandidate> {
    let top = candidates.first()?;

    if has_disambiguating_context(place_name) {
        return Some(top);
    }

    candidates
        .iter()
        .find(|c| {
            c.country
                .as_deref()
                .is_some_and(|country| country.to_lowercase().contains(PREFERRED_COUNTRY))
        })
        .or(Some(top))
}

#[derive(Debug, Clone, Copy)]
pub struct GeocodingResolver<'a> {
    provider: &'a dyn GeocodingProvider,
}

impl<'a> GeocodingResolver<'a> {
    pub fn new(provider: &'a dyn GeocodingProvider) -> Self {
        Self { provider }
    }

    /// Coordinates only; `country` is always `None`.
    pub async fn resolve_coordinates(&self, place_name: &str) -> Option<GeoResult> {
        self.resolve_with_country(place_name).await.map(|geo| GeoResult {
            country: None,
            ..geo
        })
    }

    /// Coordinates plus country, `"Unknown"` when the provider omits it.
    pub async fn resolve_with_country(&self, place_name: &str) -> Option<GeoResult> {
        let candidates = match self.provider.search(place_name, CANDIDATE_LIMIT).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("Geocoding '{place_name}' failed: {err:#}");
                return None;
            }
        };

        let chosen = select_candidate(place_name, &candidates)?;
        debug!(
            "Resolved '{}' to {} ({:.4}, {:.4}) out of {} candidates",
            place_name,
            chosen.display_name,
            chosen.latitude,
            chosen.longitude,
            candidates.len()
        );

        Some(GeoResult {
            latitude: chosen.latitude,
            longitude: chosen.longitude,
            country: Some(chosen.country.clone().unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;

    pub(crate) fn candidate(lat: f64, lon: f64, country: Option<&str>) -> GeoCandidate {
        GeoCandidate {
            display_name: format!("{lat}, {lon}"),
            latitude: lat,
            longitude: lon,
            country: country.map(str::to_string),
        }
    }

    /// Returns a fixed candidate list, or an error when `None`.
    #[derive(Debug, Default)]
    pub(crate) struct FakeGeocoder {
        pub candidates: Option<Vec<GeoCandidate>>,
    }

    #[async_trait]
    impl GeocodingProvider for FakeGeocoder {
        async fn search(&self, _query: &str, limit: usize) -> anyhow::Result<Vec<GeoCandidate>> {
            assert_eq!(limit, CANDIDATE_LIMIT);
            self.candidates
                .clone()
                .ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    fn ambiguous() -> Vec<GeoCandidate> {
        vec![
            candidate(33.6, -84.4, Some("United States")),
            candidate(8.8, 76.6, Some("India")),
            candidate(51.5, -0.1, Some("United Kingdom")),
        ]
    }

    #[test]
    fn ambiguous_name_prefers_india() {
        let candidates = ambiguous();
        let chosen = select_candidate("Kollam", &candidates).unwrap();
        assert_eq!(chosen.country.as_deref(), Some("India"));
    }

    #[test]
    fn country_hint_keeps_top_candidate() {
        let candidates = ambiguous();
        let chosen = select_candidate("Kollam, USA", &candidates).unwrap();
        assert_eq!(chosen.country.as_deref(), Some("United States"));
    }

    #[test]
    fn international_city_keeps_top_candidate() {
        let candidates = ambiguous();
        let chosen = select_candidate("Paris", &candidates).unwrap();
        assert_eq!(chosen.country.as_deref(), Some("United States"));
    }

    #[test]
    fn falls_back_to_top_without_indian_candidate() {
        let candidates = vec![
            candidate(1.0, 1.0, Some("Brazil")),
            candidate(2.0, 2.0, None),
        ];
        let chosen = select_candidate("Anywhere", &candidates).unwrap();
        assert_eq!(chosen.latitude, 1.0);
    }

    #[test]
    fn no_candidates_selects_nothing() {
        assert!(select_candidate("Bangalore", &[]).is_none());
    }

    #[tokio::test]
    async fn with_country_defaults_to_unknown() {
        let geocoder = FakeGeocoder { candidates: Some(vec![candidate(1.0, 2.0, None)]) };
        let resolver = GeocodingResolver::new(&geocoder);

        let geo = resolver.resolve_with_country("Atlantis").await.unwrap();
        assert_eq!(geo.country.as_deref(), Some(UNKNOWN_COUNTRY));
        assert_eq!(geo.coordinates(), (1.0, 2.0));
    }

    #[tokio::test]
    async fn coordinates_only_drops_country() {
        let geocoder = FakeGeocoder { candidates: Some(ambiguous()) };
        let resolver = GeocodingResolver::new(&geocoder);

        let geo = resolver.resolve_coordinates("Kollam").await.unwrap();
        assert_eq!(geo.coordinates(), (8.8, 76.6));
        assert_eq!(geo.country, None);
    }

    #[tokio::test]
    async fn provider_errors_become_absent() {
        let geocoder = FakeGeocoder { candidates: None };
        let resolver = GeocodingResolver::new(&geocoder);

        assert!(resolver.resolve_coordinates("Bangalore").await.is_none());
        assert!(resolver.resolve_with_country("Bangalore").await.is_none());
    }

    #[tokio::test]
    async fn empty_result_becomes_absent() {
        let geocoder = FakeGeocoder { candidates: Some(Vec::new()) };
        let resolver = GeocodingResolver::new(&geocoder);

        assert!(resolver.resolve_with_country("Xyzzy").await.is_none());
    }
}
