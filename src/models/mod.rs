//! Data models for the surfcast application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic points and distances
//! - Beach: Candidate beaches and candidate selection
//! - Observation: Tracked marine parameters and hourly history
//! - Forecast: Per-beach forecast bundles

pub mod beach;
pub mod forecast;
pub mod location;
pub mod observation;

// Re-export all public types for convenient access
pub use beach::{Beach, select_candidates};
pub use forecast::{BeachForecasts, ForecastBundle};
pub use location::GeoPoint;
pub use observation::{HistoricalSeries, ObservationSample, TrackedParameter};
