//! Tracked marine parameters and hourly observation history

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the four marine quantities that are forecast and scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackedParameter {
    WaveHeight,
    WavePeriod,
    WindSpeed,
    SwellHeight,
}

impl TrackedParameter {
    pub const ALL: [TrackedParameter; 4] = [
        TrackedParameter::WaveHeight,
        TrackedParameter::WavePeriod,
        TrackedParameter::WindSpeed,
        TrackedParameter::SwellHeight,
    ];

    /// Parameter name as used by the marine data API
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            TrackedParameter::WaveHeight => "waveHeight",
            TrackedParameter::WavePeriod => "wavePeriod",
            TrackedParameter::WindSpeed => "windSpeed",
            TrackedParameter::SwellHeight => "swellHeight",
        }
    }
}

impl fmt::Display for TrackedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// One hour of marine observations. `None` marks a reading the designated source did not provide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationSample {
    pub timestamp: DateTime<Utc>,
    /// Significant wave height in meters
    pub wave_height: Option<f64>,
    /// Wave period in seconds
    pub wave_period: Option<f64>,
    /// Wind speed in m/s
    pub wind_speed: Option<f64>,
    /// Swell height in meters
    pub swell_height: Option<f64>,
}

impl ObservationSample {
    #[must_use]
    pub fn reading(&self, parameter: TrackedParameter) -> Option<f64> {
        match parameter {
            TrackedParameter::WaveHeight => self.wave_height,
            TrackedParameter::WavePeriod => self.wave_period,
            TrackedParameter::WindSpeed => self.wind_speed,
            TrackedParameter::SwellHeight => self.swell_height,
        }
    }
}

/// Chronological (oldest first) hourly observations for one beach
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub samples: Vec<ObservationSample>,
}

impl HistoricalSeries {
    #[must_use]
    pub fn new(mut samples: Vec<ObservationSample>) -> Self {
        samples.sort_by_key(|sample| sample.timestamp);
        Self { samples }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Known readings of one parameter in chronological order, unknown hours skipped
    #[must_use]
    pub fn values(&self, parameter: TrackedParameter) -> Vec<f64> {
        self.samples
            .iter()
            .filter_map(|sample| sample.reading(parameter))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(hour: i64, wave_height: Option<f64>) -> ObservationSample {
        ObservationSample {
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::hours(hour),
            wave_height,
            wave_period: Some(9.0),
            wind_speed: None,
            swell_height: Some(0.4),
        }
    }

    #[test]
    fn test_values_skip_unknown_readings() {
        let series = HistoricalSeries::new(vec![
            sample(0, Some(1.0)),
            sample(1, None),
            sample(2, Some(1.5)),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.values(TrackedParameter::WaveHeight), vec![1.0, 1.5]);
        assert_eq!(series.values(TrackedParameter::WavePeriod), vec![9.0, 9.0, 9.0]);
        assert!(series.values(TrackedParameter::WindSpeed).is_empty());
    }

    #[test]
    fn test_series_is_sorted_oldest_first() {
        let series = HistoricalSeries::new(vec![
            sample(2, Some(3.0)),
            sample(0, Some(1.0)),
            sample(1, Some(2.0)),
        ]);

        assert_eq!(
            series.values(TrackedParameter::WaveHeight),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_parameter_names() {
        let names: Vec<&str> = TrackedParameter::ALL.iter().map(|p| p.api_name()).collect();
        assert_eq!(
            names,
            vec!["waveHeight", "wavePeriod", "windSpeed", "swellHeight"]
        );
        assert_eq!(
            serde_json::to_string(&TrackedParameter::SwellHeight).unwrap(),
            "\"swellHeight\""
        );
    }
}
