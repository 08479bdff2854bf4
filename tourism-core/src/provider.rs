use crate::{
    Config, GeoCandidate, PoiElement, WeatherSnapshot,
    error::ProviderError,
    provider::{nominatim::NominatimProvider, openmeteo::OpenMeteoProvider, overpass::OverpassProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod nominatim;
pub mod openmeteo;
pub mod overpass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Nominatim,
    OpenMeteo,
    Overpass,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Nominatim => "nominatim",
            ProviderId::OpenMeteo => "open-meteo",
            ProviderId::Overpass => "overpass",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Nominatim, ProviderId::OpenMeteo, ProviderId::Overpass]
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::Nominatim => "https://nominatim.openstreetmap.org/search",
            ProviderId::OpenMeteo => "https://api.open-meteo.com/v1/forecast",
            ProviderId::Overpass => "https://overpass-api.de/api/interpreter",
        }
    }

    pub fn default_timeout(&self) -> Duration {
        match self {
            ProviderId::Nominatim | ProviderId::OpenMeteo => Duration::from_secs(10),
            ProviderId::Overpass => Duration::from_secs(30),
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "nominatim" => Ok(ProviderId::Nominatim),
            "open-meteo" | "openmeteo" => Ok(ProviderId::OpenMeteo),
            "overpass" => Ok(ProviderId::Overpass),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: nominatim, open-meteo, overpass."
            )),
        }
    }
}

/// Text search returning ranked candidates with address details.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<GeoCandidate>>;
}

/// Current conditions for a coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, latitude: f64, longitude: f64) -> anyhow::Result<WeatherSnapshot>;
}

/// Radius search for tagged elements around a coordinate.
#[async_trait]
pub trait PoiProvider: Send + Sync + Debug {
    async fn around(&self, query: &PoiQuery) -> anyhow::Result<Vec<PoiElement>>;
}

/// Tag condition applied to every element kind of a radius search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilter {
    /// The key is present with any value.
    Exists(&'static str),
    /// The key's value is one of the listed values.
    OneOf(&'static str, &'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoiQuery {
    pub filter: TagFilter,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: u32,
}

/// The three upstream collaborators the pipeline talks to.
#[derive(Debug)]
pub struct Providers {
    pub geocoding: Box<dyn GeocodingProvider>,
    pub weather: Box<dyn WeatherProvider>,
    pub poi: Box<dyn PoiProvider>,
}

/// Construct all providers from config, applying endpoint and timeout overrides.
pub fn providers_from_config(config: &Config) -> anyhow::Result<Providers> {
    let client = |id: ProviderId| http_client(config.timeout(id), config.user_agent());

    Ok(Providers {
        geocoding: Box::new(NominatimProvider::new(
            config.base_url(ProviderId::Nominatim),
            client(ProviderId::Nominatim)?,
        )),
        weather: Box::new(OpenMeteoProvider::new(
            config.base_url(ProviderId::OpenMeteo),
            client(ProviderId::OpenMeteo)?,
        )),
        poi: Box::new(OverpassProvider::new(
            config.base_url(ProviderId::Overpass),
            client(ProviderId::Overpass)?,
        )),
    })
}

fn http_client(timeout: Duration, user_agent: &str) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// Read the body of a response, turning a non-success status into an error.
pub(crate) async fn read_body(provider: ProviderId, res: Response) -> anyhow::Result<String> {
    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {provider} response body"))?;

    if !status.is_success() {
        return Err(ProviderError::Status {
            provider,
            status,
            body: truncate_body(&body),
        }
        .into());
    }

    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
