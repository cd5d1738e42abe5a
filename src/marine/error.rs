use std::time::Duration;

use thiserror::Error;

/// Reasons a historical or current marine fetch failed.
/// Every variant means "no data for this beach".
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Marine API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode marine API response: {0}")]
    Decode(String),

    #[error("Marine API request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Marine API key is not configured")]
    MissingApiKey,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest_middleware::Error> for FetchError {
    fn from(err: reqwest_middleware::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
