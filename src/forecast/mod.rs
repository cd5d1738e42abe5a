//! Forecasting of tracked marine parameters
//!
//! - Model: fixed-order ARIMA fit and point forecast for one series
//! - Orchestrator: fan-out of fetch + forecast across candidate beaches

pub mod model;
pub mod orchestrator;

pub use model::{ArimaModel, FittedArima, ForecastError, forecast_series};
pub use orchestrator::ForecastOrchestrator;
