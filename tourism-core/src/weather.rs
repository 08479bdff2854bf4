use tracing::{debug, warn};

use crate::{WeatherSnapshot, provider::WeatherProvider};

#[derive(Debug, Clone, Copy)]
pub struct WeatherLookup<'a> {
    provider: &'a dyn WeatherProvider,
}

impl<'a> WeatherLookup<'a> {
    pub fn new(provider: &'a dyn WeatherProvider) -> Self {
        Self { provider }
    }

    /// Current conditions, or `None` when the provider fails or has no current data.
    pub async fn get_weather(&self, latitude: f64, longitude: f64) -> Option<WeatherSnapshot> {
        match self.provider.current(latitude, longitude).await {
            Ok(snapshot) => {
                debug!("Weather at ({latitude:.4}, {longitude:.4}): {snapshot:?}");
                Some(snapshot)
            }
            Err(err) => {
                warn!("Weather lookup at ({latitude:.4}, {longitude:.4}) failed: {err:#}");
                None
            }
        }
    }
}

pub fn format_weather_response(place_name: &str, snapshot: Option<&WeatherSnapshot>) -> String {
    match snapshot {
        Some(w) => format!(
            "In {place_name} it's currently {:.1}{} with a chance of {}% to rain.",
            w.temperature, w.temperature_unit, w.precipitation_probability_pct
        ),
        None => format!("Sorry, I couldn't fetch weather information for {place_name}."),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;

    pub(crate) fn snapshot(temperature: f64, rain: u8) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature,
            temperature_unit: "°C".into(),
            precipitation_probability_pct: rain,
            observed_at: None,
        }
    }

    #[derive(Debug, Default)]
    pub(crate) struct FakeWeather {
        pub snapshot: Option<WeatherSnapshot>,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current(&self, _latitude: f64, _longitude: f64) -> anyhow::Result<WeatherSnapshot> {
            self.snapshot
                .clone()
                .ok_or_else(|| anyhow::anyhow!("open-meteo response has no `current` section"))
        }
    }

    #[test]
    fn formats_temperature_and_rain_chance() {
        let text = format_weather_response("Bangalore", Some(&snapshot(24.0, 35)));
        assert_eq!(text, "In Bangalore it's currently 24.0°C with a chance of 35% to rain.");
    }

    #[test]
    fn apologises_without_snapshot() {
        let text = format_weather_response("Bangalore", None);
        assert_eq!(text, "Sorry, I couldn't fetch weather information for Bangalore.");
    }

    #[tokio::test]
    async fn provider_failure_is_absent() {
        let provider = FakeWeather::default();
        assert!(WeatherLookup::new(&provider).get_weather(1.0, 2.0).await.is_none());
    }

    #[tokio::test]
    async fn provider_snapshot_is_passed_through() {
        let provider = FakeWeather { snapshot: Some(snapshot(18.5, 80)) };
        let got = WeatherLookup::new(&provider).get_weather(1.0, 2.0).await;
        assert_eq!(got, Some(snapshot(18.5, 80)));
    }
}
