use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;

use crate::{error::ProviderError, model::WeatherSnapshot, provider::read_body};

use super::{ProviderId, WeatherProvider};

const DEFAULT_UNIT: &str = "°C";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self { base_url: base_url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: Option<String>,
    temperature_2m: Option<f64>,
    precipitation_probability: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentUnits {
    temperature_2m: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: Option<OmCurrent>,
    current_units: Option<OmCurrentUnits>,
}

fn parse_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", "temperature_2m,precipitation_probability"),
                ("forecast_days", "1"),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current weather)")?;

        let body = read_body(ProviderId::OpenMeteo, res).await?;

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo current JSON")?;

        let current = parsed.current.ok_or(ProviderError::MissingSection {
            provider: ProviderId::OpenMeteo,
            section: "current",
        })?;

        let temperature = current.temperature_2m.ok_or(ProviderError::MissingSection {
            provider: ProviderId::OpenMeteo,
            section: "current.temperature_2m",
        })?;

        let temperature_unit = parsed
            .current_units
            .and_then(|units| units.temperature_2m)
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());

        Ok(WeatherSnapshot {
            temperature,
            temperature_unit,
            precipitation_probability_pct: current.precipitation_probability.unwrap_or(0),
            observed_at: current.time.as_deref().and_then(parse_time),
        })
    }
}
