//! Core library for the `tourism` assistant.
//!
//! This crate defines:
//! - Place-name extraction and intent detection for free-text queries
//! - Geocoding with a disambiguation policy
//! - Weather and tourist-attraction lookups over pluggable providers
//! - The orchestrator composing a single natural-language reply
//!
//! It is used by `tourism-cli`, but can also be reused by other front-ends.

pub mod attractions;
pub mod config;
pub mod country;
pub mod error;
pub mod extract;
pub mod geocoding;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod weather;

pub use config::{Config, ProviderConfig};
pub use error::ProviderError;
pub use model::{Attraction, GeoCandidate, GeoResult, Intent, PoiElement, WeatherSnapshot};
pub use orchestrator::TourismAgent;
pub use provider::{GeocodingProvider, PoiProvider, ProviderId, Providers, WeatherProvider};
