use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::ProviderError, model::GeoCandidate, provider::read_body};

use super::{GeocodingProvider, ProviderId};

#[derive(Debug, Clone)]
pub struct NominatimProvider {
    base_url: String,
    http: Client,
}

impl NominatimProvider {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct NmAddress {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    address: Option<NmAddress>,
}

impl TryFrom<NmPlace> for GeoCandidate {
    type Error = ProviderError;

    fn try_from(place: NmPlace) -> Result<Self, Self::Error> {
        let coordinate = |value: &str| {
            value.trim().parse::<f64>().map_err(|_| ProviderError::InvalidCoordinate {
                provider: ProviderId::Nominatim,
                value: value.to_string(),
            })
        };

        Ok(GeoCandidate {
            latitude: coordinate(&place.lat)?,
            longitude: coordinate(&place.lon)?,
            country: place.address.and_then(|a| a.country),
            display_name: place.display_name,
        })
    }
}

#[async_trait]
impl GeocodingProvider for NominatimProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<GeoCandidate>> {
        let limit = limit.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .context("Failed to send request to Nominatim (search)")?;

        let body = read_body(ProviderId::Nominatim, res).await?;

        let parsed: Vec<NmPlace> =
            serde_json::from_str(&body).context("Failed to parse Nominatim search JSON")?;

        parsed
            .into_iter()
            .map(|place| GeoCandidate::try_from(place).map_err(anyhow::Error::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const BODY: &str = r#"[
        {"lat": "12.9767936", "lon": "77.590082", "display_name": "Bengaluru, Karnataka, India",
         "address": {"city": "Bengaluru", "state": "Karnataka", "country": "India", "country_code": "in"}},
        {"lat": "-33.5", "lon": "151.2", "display_name": "Somewhere"}
    ]"#;

    #[tokio::test]
    async fn search_parses_candidates_in_rank_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Bangalore".into()),
                Matcher::UrlEncoded("format".into(), "json".into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("addressdetails".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(BODY)
            .create_async()
            .await;

        let provider = NominatimProvider::new(format!("{}/search", server.url()), Client::new());
        let candidates = provider.search("Bangalore", 10).await.expect("search should succeed");

        mock.assert_async().await;
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].country.as_deref(), Some("India"));
        assert!((candidates[0].latitude - 12.9767936).abs() < 1e-9);
        assert_eq!(candidates[1].country, None);
    }

    #[tokio::test]
    async fn search_reports_http_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("busy")
            .create_async()
            .await;

        let provider = NominatimProvider::new(format!("{}/search", server.url()), Client::new());
        let err = provider.search("Bangalore", 10).await.unwrap_err();

        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn search_rejects_non_numeric_coordinates() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"lat": "north", "lon": "1.0"}]"#)
            .create_async()
            .await;

        let provider = NominatimProvider::new(format!("{}/search", server.url()), Client::new());
        let err = provider.search("Nowhere", 10).await.unwrap_err();

        assert!(err.to_string().contains("invalid coordinate"));
    }
}
