//! Skill-weighted ranking of forecast bundles
//!
//! Each beach is reduced to `sum(mean(forecast[p]) * weight[p])` over the tracked parameters,
//! then beaches are ordered by descending score. Ties keep candidate order.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{BeachForecasts, ForecastBundle, TrackedParameter};

/// User-declared surfing ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillProfile {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillProfile {
    /// Parse a free-form label. Anything not beginner or intermediate is treated as advanced.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" => SkillProfile::Beginner,
            "intermediate" => SkillProfile::Intermediate,
            _ => SkillProfile::Advanced,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkillProfile::Beginner => "beginner",
            SkillProfile::Intermediate => "intermediate",
            SkillProfile::Advanced => "advanced",
        }
    }

    #[must_use]
    pub fn weights(self) -> Weights {
        match self {
            SkillProfile::Beginner => Weights {
                wave_height: 0.4,
                wave_period: 0.2,
                wind_speed: 0.2,
                swell_height: 0.2,
            },
            SkillProfile::Intermediate => Weights {
                wave_height: 0.3,
                wave_period: 0.3,
                wind_speed: 0.2,
                swell_height: 0.2,
            },
            SkillProfile::Advanced => Weights {
                wave_height: 0.2,
                wave_period: 0.4,
                wind_speed: 0.2,
                swell_height: 0.2,
            },
        }
    }
}

impl FromStr for SkillProfile {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl fmt::Display for SkillProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-parameter weights of the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub wave_height: f64,
    pub wave_period: f64,
    pub wind_speed: f64,
    pub swell_height: f64,
}

impl Weights {
    #[must_use]
    pub fn for_parameter(&self, parameter: TrackedParameter) -> f64 {
        match parameter {
            TrackedParameter::WaveHeight => self.wave_height,
            TrackedParameter::WavePeriod => self.wave_period,
            TrackedParameter::WindSpeed => self.wind_speed,
            TrackedParameter::SwellHeight => self.swell_height,
        }
    }
}

/// How a beach lacking a parameter forecast is scored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingParameterPolicy {
    /// Leave the beach out of the ranking
    #[default]
    ExcludeBeach,
    /// Score the missing parameter as contributing zero
    ZeroFill,
}

impl MissingParameterPolicy {
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "exclude" => Some(MissingParameterPolicy::ExcludeBeach),
            "zero" => Some(MissingParameterPolicy::ZeroFill),
            _ => None,
        }
    }
}

/// Mean forecast of one parameter, or its absence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contribution {
    Present(f64),
    Absent,
}

impl Contribution {
    /// Mean of a forecast sequence; a missing or empty sequence is absent
    #[must_use]
    pub fn from_forecast(forecast: Option<&[f64]>) -> Self {
        match forecast {
            Some(values) if !values.is_empty() => {
                Contribution::Present(values.iter().sum::<f64>() / values.len() as f64)
            }
            _ => Contribution::Absent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub beach_name: String,
    pub score: f64,
}

/// Score one bundle, or `None` when the policy excludes it
#[must_use]
pub fn score_bundle(
    bundle: &ForecastBundle,
    weights: &Weights,
    policy: MissingParameterPolicy,
) -> Option<f64> {
    let mut score = 0.0;

    for parameter in TrackedParameter::ALL {
        match Contribution::from_forecast(bundle.forecast(parameter)) {
            Contribution::Present(mean) => score += mean * weights.for_parameter(parameter),
            Contribution::Absent => match policy {
                MissingParameterPolicy::ExcludeBeach => {
                    debug!(
                        "Excluding {} from ranking: no {} forecast",
                        bundle.beach_name, parameter
                    );
                    return None;
                }
                MissingParameterPolicy::ZeroFill => {}
            },
        }
    }

    Some(score)
}

/// Rank beaches by descending score; equal scores keep their original order
#[must_use]
pub fn rank_beaches(
    forecasts: &BeachForecasts,
    profile: SkillProfile,
    policy: MissingParameterPolicy,
) -> Vec<RankedEntry> {
    let weights = profile.weights();

    let mut rankings: Vec<RankedEntry> = forecasts
        .iter()
        .filter_map(|bundle| {
            score_bundle(bundle, &weights, policy).map(|score| RankedEntry {
                beach_name: bundle.beach_name.clone(),
                score,
            })
        })
        .collect();

    // Stable sort keeps candidate order for equal scores
    rankings.sort_by(|a, b| b.score.total_cmp(&a.score));
    rankings
}
