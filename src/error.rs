//! Error types and handling for the surfcast application

use thiserror::Error;

/// Main error type for a recommendation request
#[derive(Error, Debug)]
pub enum SurfError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream service communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The geocoder could not resolve the requested place
    #[error("Location not found: {query}")]
    LocationNotFound { query: String },

    /// The places search returned no beach candidates
    #[error("No beaches found near {latitude:.4}, {longitude:.4}")]
    NoBeachesFound { latitude: f64, longitude: f64 },
}

impl SurfError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn location_not_found<S: Into<String>>(query: S) -> Self {
        Self::LocationNotFound {
            query: query.into(),
        }
    }

    /// Whether the error ends the request before any ranking is attempted
    #[must_use]
    pub fn is_request_terminal(&self) -> bool {
        matches!(
            self,
            SurfError::LocationNotFound { .. } | SurfError::NoBeachesFound { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SurfError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            SurfError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            SurfError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            SurfError::LocationNotFound { query } => {
                format!("Could not find the location '{query}'.")
            }
            SurfError::NoBeachesFound { .. } => {
                "Unfortunately, we couldn't find any beaches near your location.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = SurfError::config("missing API key");
        assert!(matches!(config_err, SurfError::Config { .. }));

        let api_err = SurfError::api("connection failed");
        assert!(matches!(api_err, SurfError::Api { .. }));

        let validation_err = SurfError::validation("empty location");
        assert!(matches!(validation_err, SurfError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = SurfError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let api_err = SurfError::api("test");
        assert!(api_err.user_message().contains("Unable to connect"));

        let not_found = SurfError::location_not_found("Atlantis");
        assert!(not_found.user_message().contains("Atlantis"));

        let no_beaches = SurfError::NoBeachesFound {
            latitude: 47.0,
            longitude: 8.0,
        };
        assert!(no_beaches.user_message().contains("couldn't find any beaches"));
    }

    #[test]
    fn test_request_terminal_errors() {
        assert!(SurfError::location_not_found("x").is_request_terminal());
        assert!(
            SurfError::NoBeachesFound {
                latitude: 0.0,
                longitude: 0.0
            }
            .is_request_terminal()
        );
        assert!(!SurfError::api("boom").is_request_terminal());
    }
}
