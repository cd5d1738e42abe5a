//! Per-beach forecast bundles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TrackedParameter;

/// Forecast sequences for one beach. A parameter without a forecast is absent from the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub beach_name: String,
    pub per_parameter: BTreeMap<TrackedParameter, Vec<f64>>,
}

impl ForecastBundle {
    #[must_use]
    pub fn new(beach_name: impl Into<String>) -> Self {
        Self {
            beach_name: beach_name.into(),
            per_parameter: BTreeMap::new(),
        }
    }

    /// Add a parameter forecast, builder style
    #[must_use]
    pub fn with(mut self, parameter: TrackedParameter, forecast: Vec<f64>) -> Self {
        self.per_parameter.insert(parameter, forecast);
        self
    }

    #[must_use]
    pub fn forecast(&self, parameter: TrackedParameter) -> Option<&[f64]> {
        self.per_parameter.get(&parameter).map(Vec::as_slice)
    }

    /// First horizon step of a parameter forecast
    #[must_use]
    pub fn first_step(&self, parameter: TrackedParameter) -> Option<f64> {
        self.forecast(parameter)
            .and_then(|values| values.first().copied())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        TrackedParameter::ALL
            .iter()
            .all(|parameter| self.per_parameter.contains_key(parameter))
    }
}

/// Forecast bundles keyed by beach name, kept in candidate order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeachForecasts {
    bundles: Vec<ForecastBundle>,
}

impl BeachForecasts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bundle. A bundle for an already present beach replaces it in place.
    pub fn insert(&mut self, bundle: ForecastBundle) {
        match self
            .bundles
            .iter_mut()
            .find(|existing| existing.beach_name == bundle.beach_name)
        {
            Some(existing) => *existing = bundle,
            None => self.bundles.push(bundle),
        }
    }

    #[must_use]
    pub fn get(&self, beach_name: &str) -> Option<&ForecastBundle> {
        self.bundles
            .iter()
            .find(|bundle| bundle.beach_name == beach_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForecastBundle> {
        self.bundles.iter()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.bundles
            .iter()
            .map(|bundle| bundle.beach_name.as_str())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl FromIterator<ForecastBundle> for BeachForecasts {
    fn from_iter<I: IntoIterator<Item = ForecastBundle>>(iter: I) -> Self {
        let mut forecasts = BeachForecasts::new();
        for bundle in iter {
            forecasts.insert(bundle);
        }
        forecasts
    }
}
