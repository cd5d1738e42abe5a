//! In-memory collaborators for unit tests

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::marine::{FetchError, MarineDataSource};
use crate::models::{Beach, GeoPoint, HistoricalSeries, ObservationSample};
use crate::places::{Geocoder, PlacesSearch};

/// Hourly series with the same readings every hour
pub fn constant_series(
    hours: usize,
    wave_height: f64,
    wave_period: f64,
    wind_speed: f64,
    swell_height: f64,
) -> HistoricalSeries {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let samples = (0..hours)
        .map(|hour| ObservationSample {
            timestamp: start + chrono::Duration::hours(hour as i64),
            wave_height: Some(wave_height),
            wave_period: Some(wave_period),
            wind_speed: Some(wind_speed),
            swell_height: Some(swell_height),
        })
        .collect();
    HistoricalSeries::new(samples)
}

/// Marine source keyed by latitude; unknown points fail with HTTP 500
#[derive(Default)]
pub struct FakeMarineSource {
    series: HashMap<u64, HistoricalSeries>,
    delay: Option<Duration>,
}

impl FakeMarineSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, latitude: f64, series: HistoricalSeries) -> Self {
        self.series.insert(latitude.to_bits(), series);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn lookup(&self, point: &GeoPoint) -> Result<HistoricalSeries, FetchError> {
        self.series
            .get(&point.latitude.to_bits())
            .cloned()
            .ok_or(FetchError::Status {
                status: 500,
                body: "upstream unavailable".to_string(),
            })
    }
}

#[async_trait]
impl MarineDataSource for FakeMarineSource {
    async fn fetch_history(
        &self,
        point: &GeoPoint,
        _window_days: u32,
    ) -> Result<HistoricalSeries, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.lookup(point)
    }

    async fn fetch_current(
        &self,
        point: &GeoPoint,
    ) -> Result<Option<ObservationSample>, FetchError> {
        Ok(self.lookup(point)?.samples.last().cloned())
    }
}

/// Geocoder resolving a fixed set of place names
#[derive(Default)]
pub struct FakeGeocoder {
    places: HashMap<String, GeoPoint>,
}

impl FakeGeocoder {
    pub fn with_place(mut self, name: &str, point: GeoPoint) -> Self {
        self.places.insert(name.to_string(), point);
        self
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        Ok(self.places.get(query).copied())
    }
}

/// Places search returning the same candidates for every query
#[derive(Default)]
pub struct FakePlaces {
    beaches: Vec<Beach>,
}

impl FakePlaces {
    pub fn with_beaches(beaches: Vec<Beach>) -> Self {
        Self { beaches }
    }
}

#[async_trait]
impl PlacesSearch for FakePlaces {
    async fn nearby(
        &self,
        _center: &GeoPoint,
        _radius_m: u32,
        _keyword: &str,
    ) -> Result<Vec<Beach>> {
        Ok(self.beaches.clone())
    }
}
