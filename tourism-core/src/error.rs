use reqwest::StatusCode;
use thiserror::Error;

use crate::provider::ProviderId;

/// Typed failures of a single provider exchange.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} request failed with status {status}: {body}")]
    Status {
        provider: ProviderId,
        status: StatusCode,
        body: String,
    },

    #[error("{provider} response has no `{section}` section")]
    MissingSection {
        provider: ProviderId,
        section: &'static str,
    },

    #[error("{provider} returned an invalid coordinate '{value}'")]
    InvalidCoordinate { provider: ProviderId, value: String },
}
