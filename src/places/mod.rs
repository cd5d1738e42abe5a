//! Place lookup collaborators: free-text geocoding and nearby beach search

pub mod google;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Beach, GeoPoint};

pub use google::GoogleMapsClient;

/// Resolves a free-text place name to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `query`, or `None` when nothing matches
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>>;
}

/// Searches for named places around a point
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    /// Places matching `keyword` within `radius_m` meters of `center`, in upstream order
    async fn nearby(&self, center: &GeoPoint, radius_m: u32, keyword: &str) -> Result<Vec<Beach>>;
}
