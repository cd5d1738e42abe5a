//! Multi-beach forecast orchestration
//!
//! Each beach is an independent fetch + forecast pipeline. Pipelines run concurrently and
//! their results are re-assembled in candidate order; a failed fetch only drops its own beach.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use super::model::{ArimaModel, ForecastError};
use crate::config::ForecastConfig;
use crate::marine::{FetchError, MarineDataSource};
use crate::models::{Beach, BeachForecasts, ForecastBundle, HistoricalSeries, TrackedParameter};

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

pub struct ForecastOrchestrator {
    source: Arc<dyn MarineDataSource>,
    model: ArimaModel,
    window_days: u32,
    horizon: usize,
    concurrency: usize,
    fetch_timeout: Duration,
}

impl ForecastOrchestrator {
    pub fn new(source: Arc<dyn MarineDataSource>, config: &ForecastConfig) -> Self {
        Self {
            source,
            model: ArimaModel::default(),
            window_days: config.window_days,
            horizon: config.horizon as usize,
            concurrency: config.concurrency.max(1) as usize,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Upper bound for one beach's fetch; an elapsed fetch counts as failed
    #[must_use]
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Forecast bundles for every beach whose history could be fetched, in candidate order
    #[instrument(skip(self, beaches), fields(beaches = beaches.len()))]
    pub async fn forecast_beaches(&self, beaches: &[Beach]) -> BeachForecasts {
        let mut results: Vec<(usize, Option<ForecastBundle>)> =
            stream::iter(beaches.iter().cloned().enumerate())
                .map(|(index, beach)| async move { (index, self.forecast_beach(&beach).await) })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        results.sort_by_key(|(index, _)| *index);

        let forecasts: BeachForecasts = results
            .into_iter()
            .filter_map(|(_, bundle)| bundle)
            .collect();

        info!(
            "Forecast {} of {} candidate beaches",
            forecasts.len(),
            beaches.len()
        );
        forecasts
    }

    async fn forecast_beach(&self, beach: &Beach) -> Option<ForecastBundle> {
        match self.fetch_history(beach).await {
            Ok(series) => {
                debug!("Fetched {} samples for {}", series.len(), beach.name);
                Some(self.forecast_bundle(&beach.name, &series))
            }
            Err(e) => {
                warn!("Skipping {}: {}", beach.name, e);
                None
            }
        }
    }

    async fn fetch_history(&self, beach: &Beach) -> Result<HistoricalSeries, FetchError> {
        let fetch = self.source.fetch_history(&beach.location, self.window_days);
        tokio::time::timeout(self.fetch_timeout, fetch)
            .await
            .map_err(|_| FetchError::Timeout(self.fetch_timeout))?
    }

    /// Forecast every tracked parameter of a fetched series.
    /// Parameters without a forecast are left out.
    #[must_use]
    pub fn forecast_bundle(&self, beach_name: &str, series: &HistoricalSeries) -> ForecastBundle {
        let mut bundle = ForecastBundle::new(beach_name);

        for parameter in TrackedParameter::ALL {
            let values = series.values(parameter);
            let forecast = self
                .model
                .fit(&values)
                .and_then(|fitted| fitted.forecast(self.horizon));

            match forecast {
                Ok(forecast) => {
                    bundle.per_parameter.insert(parameter, forecast);
                }
                Err(ForecastError::NoObservations) => {
                    debug!("No {} observations for {}", parameter, beach_name);
                }
                Err(e) => {
                    warn!("No {} forecast for {}: {}", parameter, beach_name, e);
                }
            }
        }

        bundle
    }
}
