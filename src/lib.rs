//! `surfcast` - Surf beach recommendations from short-horizon marine forecasts
//!
//! This library fetches historical marine observations for candidate beaches,
//! forecasts the next hours with an ARIMA model and ranks the beaches for a surfer's skill.

pub mod api;
pub mod config;
pub mod error;
pub mod forecast;
pub mod http;
pub mod logging;
pub mod marine;
pub mod models;
pub mod places;
pub mod ranking;
pub mod recommend;
pub mod units;
pub mod web;

#[cfg(test)]
mod test_support;

// Re-export core types for public API
pub use config::SurfConfig;
pub use error::SurfError;
pub use forecast::{ArimaModel, ForecastError, ForecastOrchestrator, forecast_series};
pub use marine::{FetchError, MarineDataSource, StormGlassClient};
pub use models::{
    Beach, BeachForecasts, ForecastBundle, GeoPoint, HistoricalSeries, ObservationSample,
    TrackedParameter,
};
pub use places::{Geocoder, GoogleMapsClient, PlacesSearch};
pub use ranking::{MissingParameterPolicy, RankedEntry, SkillProfile, Weights, rank_beaches};
pub use recommend::{BeachRecommendation, ConditionsSnapshot, Recommendation, RecommendationService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SurfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
