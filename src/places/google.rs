//! Google Maps geocoding and nearby search

use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{Geocoder, PlacesSearch};
use crate::config::PlacesConfig;
use crate::models::{Beach, GeoPoint};

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

pub struct GoogleMapsClient {
    client: ClientWithMiddleware,
    api_key: Option<String>,
    base_url: String,
}

impl GoogleMapsClient {
    pub fn new(client: ClientWithMiddleware, config: &PlacesConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("Places API key is not configured")
    }

    fn geocode_url(&self, query: &str, api_key: &str) -> String {
        format!(
            "{}/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(api_key)
        )
    }

    fn nearby_url(&self, center: &GeoPoint, radius_m: u32, keyword: &str, api_key: &str) -> String {
        format!(
            "{}/place/nearbysearch/json?location={},{}&radius={}&keyword={}&key={}",
            self.base_url,
            center.latitude,
            center.longitude,
            radius_m,
            urlencoding::encode(keyword),
            urlencoding::encode(api_key)
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| "Failed to reach Google Maps API")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Google Maps API returned HTTP {}", status));
        }

        response
            .json()
            .await
            .with_context(|| "Failed to parse Google Maps API response")
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>> {
        info!("Geocoding location: '{}'", query);
        let start_time = Instant::now();

        let url = self.geocode_url(query, self.api_key()?);
        let response: wire::GeocodeResponse = self.get_json(&url).await?;
        let point = wire::first_location(response)?;

        match &point {
            Some(point) => info!(
                "Geocoded '{}' to {} in {:.3}s",
                query,
                point.format_coordinates(),
                start_time.elapsed().as_secs_f64()
            ),
            None => warn!("No results found for location '{}'", query),
        }

        Ok(point)
    }
}

#[async_trait]
impl PlacesSearch for GoogleMapsClient {
    #[instrument(skip(self), fields(center = %center.format_coordinates()))]
    async fn nearby(&self, center: &GeoPoint, radius_m: u32, keyword: &str) -> Result<Vec<Beach>> {
        let url = self.nearby_url(center, radius_m, keyword, self.api_key()?);
        let response: wire::NearbyResponse = self.get_json(&url).await?;
        let places = wire::into_beaches(response)?;

        debug!("Nearby search returned {} places", places.len());
        Ok(places)
    }
}

/// Google Maps response structures
pub(crate) mod wire {
    use anyhow::{Result, anyhow};
    use serde::Deserialize;
    use tracing::debug;

    use super::{STATUS_OK, STATUS_ZERO_RESULTS};
    use crate::models::{Beach, GeoPoint};

    #[derive(Debug, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub location: Option<LatLng>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResult {
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        pub status: String,
        #[serde(default)]
        pub results: Vec<GeocodeResult>,
        pub error_message: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PlaceResult {
        pub name: Option<String>,
        pub geometry: Option<Geometry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct NearbyResponse {
        pub status: String,
        #[serde(default)]
        pub results: Vec<PlaceResult>,
        pub error_message: Option<String>,
    }

    /// `Ok(false)` for ZERO_RESULTS, `Ok(true)` for OK, an error for anything else
    fn check_status(status: &str, error_message: Option<&str>) -> Result<bool> {
        match status {
            STATUS_OK => Ok(true),
            STATUS_ZERO_RESULTS => Ok(false),
            other => Err(anyhow!(
                "Google Maps API status {}: {}",
                other,
                error_message.unwrap_or("no details")
            )),
        }
    }

    pub fn first_location(response: GeocodeResponse) -> Result<Option<GeoPoint>> {
        if !check_status(&response.status, response.error_message.as_deref())? {
            return Ok(None);
        }

        Ok(response
            .results
            .into_iter()
            .find_map(|result| result.geometry.location)
            .map(|location| GeoPoint::new(location.lat, location.lng)))
    }

    /// Places with both a name and a location, in response order
    pub fn into_beaches(response: NearbyResponse) -> Result<Vec<Beach>> {
        if !check_status(&response.status, response.error_message.as_deref())? {
            return Ok(Vec::new());
        }

        Ok(response
            .results
            .into_iter()
            .filter_map(|place| {
                let location = place.geometry.and_then(|geometry| geometry.location);
                match (place.name, location) {
                    (Some(name), Some(location)) => {
                        Some(Beach::new(name, GeoPoint::new(location.lat, location.lng)))
                    }
                    (name, _) => {
                        debug!("Skipping incomplete place entry {:?}", name);
                        None
                    }
                }
            })
            .collect())
    }
}
