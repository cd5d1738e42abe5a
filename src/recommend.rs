//! Beach recommendation pipeline
//!
//! Resolves a location, discovers candidate beaches, forecasts their conditions and ranks them
//! for a skill profile. The result carries the first forecast step of every parameter in display
//! units next to each ranked beach.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::SurfConfig;
use crate::forecast::ForecastOrchestrator;
use crate::marine::MarineDataSource;
use crate::http;
use crate::models::{
    Beach, ForecastBundle, GeoPoint, ObservationSample, TrackedParameter, select_candidates,
};
use crate::places::{Geocoder, PlacesSearch};
use crate::ranking::{MissingParameterPolicy, SkillProfile, rank_beaches};
use crate::units::{meters_to_feet, mps_to_mph, round_to};
use crate::{Result, SurfError};

/// Marine conditions in display units, rounded to 2 decimal places; `None` is shown as "N/A"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsSnapshot {
    pub wave_height_m: Option<f64>,
    pub wave_height_ft: Option<f64>,
    pub wave_period_s: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_speed_mph: Option<f64>,
    pub swell_height_m: Option<f64>,
}

impl ConditionsSnapshot {
    #[must_use]
    pub fn from_readings(
        wave_height: Option<f64>,
        wave_period: Option<f64>,
        wind_speed: Option<f64>,
        swell_height: Option<f64>,
    ) -> Self {
        let wave_height_m = wave_height.map(|value| round_to(value, 2));
        let wind_speed_mps = wind_speed.map(|value| round_to(value, 2));

        Self {
            wave_height_m,
            wave_height_ft: wave_height_m.map(meters_to_feet),
            wave_period_s: wave_period.map(|value| round_to(value, 2)),
            wind_speed_mps,
            wind_speed_mph: wind_speed_mps.map(mps_to_mph),
            swell_height_m: swell_height.map(|value| round_to(value, 2)),
        }
    }

    /// First forecast step of each parameter
    #[must_use]
    pub fn from_bundle(bundle: &ForecastBundle) -> Self {
        Self::from_readings(
            bundle.first_step(TrackedParameter::WaveHeight),
            bundle.first_step(TrackedParameter::WavePeriod),
            bundle.first_step(TrackedParameter::WindSpeed),
            bundle.first_step(TrackedParameter::SwellHeight),
        )
    }

    #[must_use]
    pub fn from_sample(sample: &ObservationSample) -> Self {
        Self::from_readings(
            sample.wave_height,
            sample.wave_period,
            sample.wind_speed,
            sample.swell_height,
        )
    }
}

fn or_na(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |value| value.to_string())
}

impl Display for ConditionsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "   🌊 Wave Height: {} meters / {} feet",
            or_na(self.wave_height_m),
            or_na(self.wave_height_ft)
        )?;
        writeln!(f, "   ⏱️ Wave Period: {} seconds", or_na(self.wave_period_s))?;
        writeln!(
            f,
            "   💨 Wind Speed: {} m/s / {} mph",
            or_na(self.wind_speed_mps),
            or_na(self.wind_speed_mph)
        )?;
        writeln!(f, "   🌀 Swell Height: {} meters", or_na(self.swell_height_m))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeachRecommendation {
    /// 1-based position in the ranking
    pub rank: usize,
    pub name: String,
    pub location: GeoPoint,
    pub score: f64,
    pub distance_km: f64,
    pub conditions: ConditionsSnapshot,
}

impl Display for BeachRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}. {} ({:.1} km away)",
            self.rank, self.name, self.distance_km
        )?;
        write!(f, "{}", self.conditions)?;
        writeln!(f, "   ⭐ Score: {}", round_to(self.score, 2))
    }
}

/// Ranked beaches for one request, most favorable first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub query: String,
    pub origin: GeoPoint,
    pub skill: SkillProfile,
    pub beaches: Vec<BeachRecommendation>,
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Beach recommendations near {} ({}) for {} surfers",
            self.query,
            self.origin.format_coordinates(),
            self.skill
        )?;

        if self.beaches.is_empty() {
            writeln!(f, "No forecasts could be produced for the nearby beaches.")?;
        }
        for beach in &self.beaches {
            writeln!(f)?;
            write!(f, "{beach}")?;
        }
        Ok(())
    }
}

pub struct RecommendationService {
    geocoder: Arc<dyn Geocoder>,
    places: Arc<dyn PlacesSearch>,
    source: Arc<dyn MarineDataSource>,
    orchestrator: ForecastOrchestrator,
    search_radius_m: u32,
    keyword: String,
    max_beaches: usize,
    policy: MissingParameterPolicy,
}

impl RecommendationService {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        places: Arc<dyn PlacesSearch>,
        source: Arc<dyn MarineDataSource>,
        config: &SurfConfig,
    ) -> Self {
        let fetch_timeout =
            http::request_budget(config.marine.timeout(), config.marine.max_retries);
        let orchestrator = ForecastOrchestrator::new(Arc::clone(&source), &config.forecast)
            .with_fetch_timeout(fetch_timeout);

        Self {
            geocoder,
            places,
            source,
            orchestrator,
            search_radius_m: config.places.search_radius_m,
            keyword: config.places.keyword.clone(),
            max_beaches: config.places.max_beaches as usize,
            policy: config.ranking.policy(),
        }
    }

    /// Rank the beaches near `location` for `skill`
    #[instrument(skip(self))]
    pub async fn recommend(&self, location: &str, skill: SkillProfile) -> Result<Recommendation> {
        let query = location.trim();
        if query.is_empty() {
            return Err(SurfError::validation("Location cannot be empty"));
        }

        let origin = self
            .geocoder
            .geocode(query)
            .await
            .map_err(|e| SurfError::api(format!("Geocoding '{query}' failed: {e:#}")))?
            .ok_or_else(|| SurfError::location_not_found(query))?;

        let candidates = self.find_candidates(&origin).await?;
        info!(
            "Found {} candidate beaches near {}",
            candidates.len(),
            origin.format_coordinates()
        );

        let forecasts = self.orchestrator.forecast_beaches(&candidates).await;
        let rankings = rank_beaches(&forecasts, skill, self.policy);
        if rankings.is_empty() {
            warn!("No beach near '{}' could be ranked", query);
        }

        let beaches = rankings
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let beach = candidates.iter().find(|beach| beach.name == entry.beach_name)?;
                let bundle = forecasts.get(&entry.beach_name)?;
                Some(BeachRecommendation {
                    rank: index + 1,
                    name: entry.beach_name,
                    location: beach.location,
                    score: entry.score,
                    distance_km: round_to(origin.distance_km(&beach.location), 2),
                    conditions: ConditionsSnapshot::from_bundle(bundle),
                })
            })
            .collect();

        Ok(Recommendation {
            query: query.to_string(),
            origin,
            skill,
            beaches,
        })
    }

    async fn find_candidates(&self, origin: &GeoPoint) -> Result<Vec<Beach>> {
        let places = self
            .places
            .nearby(origin, self.search_radius_m, &self.keyword)
            .await
            .map_err(|e| SurfError::api(format!("Nearby search failed: {e:#}")))?;

        let candidates = select_candidates(places, self.max_beaches);
        if candidates.is_empty() {
            return Err(SurfError::NoBeachesFound {
                latitude: origin.latitude,
                longitude: origin.longitude,
            });
        }
        Ok(candidates)
    }

    /// Marine conditions at `point` for the current hour, if the source has a reading
    #[instrument(skip(self), fields(point = %point.format_coordinates()))]
    pub async fn current_conditions(&self, point: &GeoPoint) -> Result<Option<ConditionsSnapshot>> {
        if !point.is_valid() {
            return Err(SurfError::validation(format!(
                "Coordinates out of range: {}",
                point.format_coordinates()
            )));
        }

        let sample = self
            .source
            .fetch_current(point)
            .await
            .map_err(|e| SurfError::api(e.to_string()))?;

        Ok(sample.as_ref().map(ConditionsSnapshot::from_sample))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeGeocoder, FakeMarineSource, FakePlaces, constant_series};

    const SYDNEY: GeoPoint = GeoPoint {
        latitude: -33.8688,
        longitude: 151.2093,
    };

    fn beach(name: &str, latitude: f64) -> Beach {
        Beach::new(name, GeoPoint::new(latitude, 151.27))
    }

    fn service(places: Vec<Beach>, source: FakeMarineSource) -> RecommendationService {
        RecommendationService::new(
            Arc::new(FakeGeocoder::default().with_place("Sydney", SYDNEY)),
            Arc::new(FakePlaces::with_beaches(places)),
            Arc::new(source),
            &SurfConfig::default(),
        )
    }

    fn doubled_fixture() -> RecommendationService {
        let source = FakeMarineSource::new()
            .with_series(-33.89, constant_series(240, 1.0, 10.0, 5.0, 0.5))
            .with_series(-33.90, constant_series(240, 2.0, 20.0, 10.0, 1.0));
        service(vec![beach("A", -33.89), beach("B", -33.90)], source)
    }

    #[test]
    fn test_snapshot_converts_rounded_values() {
        let snapshot = ConditionsSnapshot::from_readings(Some(1.0), Some(9.876), Some(1.0), None);

        assert_eq!(snapshot.wave_height_m, Some(1.0));
        assert_eq!(snapshot.wave_height_ft, Some(3.28));
        assert_eq!(snapshot.wave_period_s, Some(9.88));
        assert_eq!(snapshot.wind_speed_mph, Some(2.24));
        assert_eq!(snapshot.swell_height_m, None);
        assert!(snapshot.to_string().contains("Swell Height: N/A meters"));
    }

    #[tokio::test]
    async fn test_doubled_conditions_outrank_under_every_profile() {
        let service = doubled_fixture();

        for skill in [
            SkillProfile::Beginner,
            SkillProfile::Intermediate,
            SkillProfile::Advanced,
        ] {
            let recommendation = service.recommend("Sydney", skill).await.unwrap();

            let names: Vec<&str> = recommendation
                .beaches
                .iter()
                .map(|beach| beach.name.as_str())
                .collect();
            assert_eq!(names, vec!["B", "A"]);
            assert_eq!(recommendation.beaches[0].rank, 1);
        }
    }

    #[tokio::test]
    async fn test_entries_carry_first_step_conditions() {
        let recommendation = doubled_fixture()
            .recommend("Sydney", SkillProfile::Intermediate)
            .await
            .unwrap();

        let top = &recommendation.beaches[0];
        assert_eq!(top.conditions.wave_height_m, Some(2.0));
        assert_eq!(top.conditions.wave_height_ft, Some(6.56));
        assert_eq!(top.conditions.wave_period_s, Some(20.0));
        assert_eq!(top.conditions.wind_speed_mps, Some(10.0));
        assert_eq!(top.conditions.wind_speed_mph, Some(22.37));
        assert_eq!(top.conditions.swell_height_m, Some(1.0));
        assert!((top.score - (2.0 * 0.3 + 20.0 * 0.3 + 10.0 * 0.2 + 1.0 * 0.2)).abs() < 1e-6);
        assert!(top.distance_km > 0.0 && top.distance_km < 10.0);
    }

    #[tokio::test]
    async fn test_blank_location_is_rejected() {
        let result = doubled_fixture().recommend("   ", SkillProfile::Beginner).await;
        assert!(matches!(result, Err(SurfError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_unknown_location_is_not_found() {
        let result = doubled_fixture().recommend("Atlantis", SkillProfile::Beginner).await;
        assert!(
            matches!(result, Err(SurfError::LocationNotFound { query }) if query == "Atlantis")
        );
    }

    #[tokio::test]
    async fn test_no_nearby_beaches() {
        let service = service(Vec::new(), FakeMarineSource::new());

        let result = service.recommend("Sydney", SkillProfile::Beginner).await;

        assert!(matches!(result, Err(SurfError::NoBeachesFound { .. })));
    }

    #[tokio::test]
    async fn test_failed_beach_is_left_out_of_the_ranking() {
        let source = FakeMarineSource::new()
            .with_series(-33.89, constant_series(240, 1.0, 10.0, 5.0, 0.5))
            .with_series(-33.91, constant_series(240, 1.5, 11.0, 5.0, 0.5));
        let service = service(
            vec![beach("A", -33.89), beach("Offline", -33.90), beach("C", -33.91)],
            source,
        );

        let recommendation = service.recommend("Sydney", SkillProfile::Advanced).await.unwrap();

        assert_eq!(recommendation.beaches.len(), 2);
        assert!(recommendation.beaches.iter().all(|beach| beach.name != "Offline"));
    }

    #[tokio::test]
    async fn test_candidates_are_deduplicated_and_truncated() {
        let mut places = vec![beach("A", -33.80), beach("A", -33.81)];
        let mut source =
            FakeMarineSource::new().with_series(-33.80, constant_series(24, 1.0, 10.0, 5.0, 0.5));
        for i in 0..6 {
            let latitude = -34.0 - f64::from(i) / 10.0;
            places.push(beach(&format!("Beach {i}"), latitude));
            source = source.with_series(latitude, constant_series(24, 1.0, 10.0, 5.0, 0.5));
        }
        let service = service(places, source);

        let recommendation = service.recommend("Sydney", SkillProfile::Beginner).await.unwrap();

        assert_eq!(recommendation.beaches.len(), 5);
        let a_entries = recommendation
            .beaches
            .iter()
            .filter(|beach| beach.name == "A")
            .count();
        assert_eq!(a_entries, 1);
    }

    #[tokio::test]
    async fn test_current_conditions() {
        let source =
            FakeMarineSource::new().with_series(-33.89, constant_series(3, 1.234, 9.0, 4.0, 0.4));
        let service = service(Vec::new(), source);

        let snapshot = service
            .current_conditions(&GeoPoint::new(-33.89, 151.27))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.wave_height_m, Some(1.23));

        let invalid = service.current_conditions(&GeoPoint::new(95.0, 0.0)).await;
        assert!(matches!(invalid, Err(SurfError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_display_lists_ranked_beaches() {
        let recommendation = doubled_fixture()
            .recommend("Sydney", SkillProfile::Beginner)
            .await
            .unwrap();

        let text = recommendation.to_string();

        assert!(text.contains("for beginner surfers"));
        assert!(text.contains("1. B"));
        assert!(text.contains("2. A"));
        assert!(text.contains("Wave Height: 2 meters / 6.56 feet"));
    }
}
