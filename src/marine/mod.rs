//! Historical marine observations
//!
//! The [`MarineDataSource`] trait is the fetcher boundary: raw upstream responses are decoded
//! into [`HistoricalSeries`] here and nowhere else.

pub mod error;
pub mod stormglass;

use async_trait::async_trait;

use crate::models::{GeoPoint, HistoricalSeries, ObservationSample};

pub use error::FetchError;
pub use stormglass::StormGlassClient;

/// Source of per-hour marine observations for a single point
#[async_trait]
pub trait MarineDataSource: Send + Sync {
    /// Hourly observations for the closed interval `[now - window_days, now]`
    async fn fetch_history(
        &self,
        point: &GeoPoint,
        window_days: u32,
    ) -> Result<HistoricalSeries, FetchError>;

    /// Observation for the current hour, if the source has one
    async fn fetch_current(
        &self,
        point: &GeoPoint,
    ) -> Result<Option<ObservationSample>, FetchError>;
}
