//! Storm Glass marine weather client

use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use super::{FetchError, MarineDataSource};
use crate::config::MarineConfig;
use crate::models::{GeoPoint, HistoricalSeries, ObservationSample, TrackedParameter};

/// Storm Glass point-weather client reading a single designated data source
pub struct StormGlassClient {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
    source: String,
}

impl StormGlassClient {
    /// Create a new client on top of the shared HTTP client
    pub fn new(client: ClientWithMiddleware, config: &MarineConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            source: config.source.clone(),
        }
    }

    fn point_url(&self, point: &GeoPoint, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        let params: Vec<&str> = TrackedParameter::ALL
            .iter()
            .map(|parameter| parameter.api_name())
            .collect();

        format!(
            "{}/weather/point?lat={}&lng={}&params={}&source={}&start={}&end={}",
            self.base_url,
            point.latitude,
            point.longitude,
            params.join(","),
            urlencoding::encode(&self.source),
            start.timestamp(),
            end.timestamp()
        )
    }

    async fn fetch_range(
        &self,
        point: &GeoPoint,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ObservationSample>, FetchError> {
        if !point.is_valid() {
            return Err(FetchError::InvalidRequest(format!(
                "coordinates out of range: {}",
                point.format_coordinates()
            )));
        }
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        let url = self.point_url(point, start, end);
        debug!("Storm Glass request URL: {}", url);
        let request_start = Instant::now();

        let response = self
            .client
            .get(&url)
            .header("Authorization", api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Storm Glass returned HTTP {} for {}", status, point.format_coordinates());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: wire::PointResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let samples = wire::decode_hours(payload, &self.source);
        info!(
            "Retrieved {} hourly samples for {} in {:.3}s",
            samples.len(),
            point.format_coordinates(),
            request_start.elapsed().as_secs_f64()
        );

        Ok(samples)
    }
}

#[async_trait]
impl MarineDataSource for StormGlassClient {
    #[instrument(skip(self), fields(source = %self.source))]
    async fn fetch_history(
        &self,
        point: &GeoPoint,
        window_days: u32,
    ) -> Result<HistoricalSeries, FetchError> {
        if window_days == 0 {
            return Err(FetchError::InvalidRequest(
                "window must cover at least one day".to_string(),
            ));
        }

        let end = Utc::now();
        let start = end - Duration::days(i64::from(window_days));
        let samples = self.fetch_range(point, start, end).await?;

        Ok(HistoricalSeries::new(samples))
    }

    #[instrument(skip(self), fields(source = %self.source))]
    async fn fetch_current(
        &self,
        point: &GeoPoint,
    ) -> Result<Option<ObservationSample>, FetchError> {
        let now = Utc::now();
        let samples = self.fetch_range(point, now, now).await?;
        Ok(samples.into_iter().next())
    }
}

/// Storm Glass response structures and decoding into observation samples
pub(crate) mod wire {
    use std::collections::HashMap;

    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    use crate::models::ObservationSample;

    /// Readings of one parameter keyed by contributing source
    pub type SourceReadings = HashMap<String, Option<f64>>;

    #[derive(Debug, Deserialize)]
    pub struct PointResponse {
        #[serde(default)]
        pub hours: Vec<HourRecord>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct HourRecord {
        pub time: DateTime<Utc>,
        #[serde(default)]
        pub wave_height: SourceReadings,
        #[serde(default)]
        pub wave_period: SourceReadings,
        #[serde(default)]
        pub wind_speed: SourceReadings,
        #[serde(default)]
        pub swell_height: SourceReadings,
    }

    fn reading(readings: &SourceReadings, source: &str) -> Option<f64> {
        readings
            .get(source)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }

    /// One sample per hour; readings missing from `source` become unknown
    pub fn decode_hours(response: PointResponse, source: &str) -> Vec<ObservationSample> {
        response
            .hours
            .into_iter()
            .map(|hour| ObservationSample {
                timestamp: hour.time,
                wave_height: reading(&hour.wave_height, source),
                wave_period: reading(&hour.wave_period, source),
                wind_speed: reading(&hour.wind_speed, source),
                swell_height: reading(&hour.swell_height, source),
            })
            .collect()
    }
}
