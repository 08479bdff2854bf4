use tracing::{debug, info};

use crate::{
    Config,
    attractions::{AttractionFinder, format_places_response},
    extract::{determine_intent, extract_place_name},
    geocoding::GeocodingResolver,
    provider::{Providers, providers_from_config},
    weather::{WeatherLookup, format_weather_response},
};

pub const UNIDENTIFIED_PLACE_MESSAGE: &str =
    "I couldn't identify the place you want to visit. Please specify a place name.";

pub const UNKNOWN_PLACE_MESSAGE: &str = "I don't know this place exists. Could you please check \
     the spelling or provide more details about the location?";

/// Entry point for front-ends: one free-text query in, one reply out.
///
/// Holds no per-request state, so a single agent can serve any number of
/// queries, including concurrently.
#[derive(Debug)]
pub struct TourismAgent {
    providers: Providers,
    places_limit: usize,
}

impl TourismAgent {
    pub fn new(providers: Providers, places_limit: usize) -> Self {
        Self { providers, places_limit }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(providers_from_config(config)?, config.places_limit()))
    }

    fn resolver(&self) -> GeocodingResolver<'_> {
        GeocodingResolver::new(self.providers.geocoding.as_ref())
    }

    pub async fn process_request(&self, text: &str) -> String {
        let Some(place) = extract_place_name(text) else {
            debug!("No place name found in {text:?}");
            return UNIDENTIFIED_PLACE_MESSAGE.to_string();
        };

        let Some(geo) = self.resolver().resolve_coordinates(&place).await else {
            return UNKNOWN_PLACE_MESSAGE.to_string();
        };

        let intent = determine_intent(text);
        info!("Query for '{place}' with intent {intent:?}");

        let weather = if intent.weather {
            WeatherLookup::new(self.providers.weather.as_ref())
                .get_weather(geo.latitude, geo.longitude)
                .await
                .map(|snapshot| format_weather_response(&place, Some(&snapshot)))
        } else {
            None
        };

        let places = if intent.places {
            AttractionFinder::new(self.resolver(), self.providers.poi.as_ref())
                .get_tourist_places(&place, self.places_limit)
                .await
                .map(|places| format_places_response(&place, Some(places.as_slice())))
        } else {
            None
        };

        compose_reply(&place, weather, places)
    }
}

/// Merge the collected parts into a single reply.
pub fn compose_reply(place: &str, weather: Option<String>, places: Option<String>) -> String {
    match (weather, places) {
        (Some(weather), Some(places)) => {
            let weather = weather.strip_suffix('.').unwrap_or(&weather);
            let list = places.split_once('\n').map_or(places.as_str(), |(_, rest)| rest);
            format!("{weather}. And these are the places you can go:\n{list}")
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => format!("Sorry, I couldn't fetch information for {place}."),
    }
}
