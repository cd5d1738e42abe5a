//! ARIMA(p, d, 0) forecasting for a single parameter series
//!
//! The series is differenced `d` times and an autoregression without intercept is fitted to
//! the differenced values by conditional least squares. Forecasts are produced recursively on
//! the differenced scale and integrated back to the original units.

use thiserror::Error;

/// Autoregressive order used for marine parameters
pub const DEFAULT_AR_ORDER: usize = 5;
/// Differencing order used for marine parameters
pub const DEFAULT_DIFFERENCING: usize = 1;

/// Relative ridge term keeping the normal equations positive definite
const RIDGE: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("no observations to fit")]
    NoObservations,

    #[error("model fit failed: {reason}")]
    ModelFitFailed { reason: String },
}

impl ForecastError {
    fn fit_failed<S: Into<String>>(reason: S) -> Self {
        Self::ModelFitFailed {
            reason: reason.into(),
        }
    }
}

/// Fixed-order ARIMA specification with no moving-average terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaModel {
    ar_order: usize,
    differencing: usize,
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new(DEFAULT_AR_ORDER, DEFAULT_DIFFERENCING)
    }
}

impl ArimaModel {
    #[must_use]
    pub fn new(ar_order: usize, differencing: usize) -> Self {
        Self {
            ar_order,
            differencing,
        }
    }

    /// Fit the model to a chronological series of observations.
    ///
    /// Series too short for the full AR order are fitted with the largest order they
    /// support, down to a pure random walk for a single observation.
    pub fn fit(&self, series: &[f64]) -> Result<FittedArima, ForecastError> {
        if series.is_empty() {
            return Err(ForecastError::NoObservations);
        }
        if series.iter().any(|value| !value.is_finite()) {
            return Err(ForecastError::fit_failed("series contains non-finite values"));
        }
        if series.len() < self.differencing {
            return Err(ForecastError::fit_failed(format!(
                "{} observations cannot be differenced {} times",
                series.len(),
                self.differencing
            )));
        }

        // Last value of each differencing level, used to integrate forecasts back
        let mut levels = Vec::with_capacity(self.differencing);
        let mut differenced = series.to_vec();
        for _ in 0..self.differencing {
            if let Some(&last) = differenced.last() {
                levels.push(last);
            }
            differenced = difference(&differenced);
        }

        let order = self.ar_order.min(differenced.len() / 2);
        let coefficients = least_squares_ar(&differenced, order)?;

        Ok(FittedArima {
            coefficients,
            history: differenced,
            levels,
        })
    }
}

/// A fitted model ready to produce point forecasts
#[derive(Debug, Clone)]
pub struct FittedArima {
    /// AR coefficients, lag 1 first
    coefficients: Vec<f64>,
    /// Differenced series the model was fitted on
    history: Vec<f64>,
    levels: Vec<f64>,
}

impl FittedArima {
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Point forecast for the next `steps` observations
    pub fn forecast(&self, steps: usize) -> Result<Vec<f64>, ForecastError> {
        let mut differenced = self.history.clone();
        let mut levels = self.levels.clone();
        let mut forecast = Vec::with_capacity(steps);

        for _ in 0..steps {
            let next: f64 = self
                .coefficients
                .iter()
                .zip(differenced.iter().rev())
                .map(|(phi, value)| phi * value)
                .sum();
            differenced.push(next);

            let mut value = next;
            for level in levels.iter_mut().rev() {
                *level += value;
                value = *level;
            }

            if !value.is_finite() {
                return Err(ForecastError::fit_failed("forecast diverged"));
            }
            forecast.push(value);
        }

        Ok(forecast)
    }
}

/// Fit the default ARIMA(5, 1, 0) model and forecast `horizon` steps
pub fn forecast_series(series: &[f64], horizon: usize) -> Result<Vec<f64>, ForecastError> {
    ArimaModel::default().fit(series)?.forecast(horizon)
}

fn difference(series: &[f64]) -> Vec<f64> {
    series.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Conditional least squares for `w[t] = sum(phi[i] * w[t - 1 - i])`
fn least_squares_ar(series: &[f64], order: usize) -> Result<Vec<f64>, ForecastError> {
    if order == 0 {
        return Ok(Vec::new());
    }

    // Normal equations: (X'X) phi = X'y
    let mut gram = vec![vec![0.0; order]; order];
    let mut moment = vec![0.0; order];
    for t in order..series.len() {
        let lags: Vec<f64> = (1..=order).map(|lag| series[t - lag]).collect();
        for i in 0..order {
            moment[i] += lags[i] * series[t];
            for j in 0..order {
                gram[i][j] += lags[i] * lags[j];
            }
        }
    }

    let trace: f64 = (0..order).map(|i| gram[i][i]).sum();
    let ridge = RIDGE * (trace / order as f64).max(1.0);
    for (i, row) in gram.iter_mut().enumerate() {
        row[i] += ridge;
    }

    solve_cholesky(gram, moment)
}

/// Solve `a x = b` for symmetric positive definite `a`
fn solve_cholesky(a: Vec<Vec<f64>>, b: Vec<f64>) -> Result<Vec<f64>, ForecastError> {
    let n = b.len();
    let mut lower = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| lower[i][k] * lower[j][k]).sum();
            if i == j {
                let diagonal = a[i][i] - sum;
                if diagonal <= 0.0 || !diagonal.is_finite() {
                    return Err(ForecastError::fit_failed(
                        "normal equations are not positive definite",
                    ));
                }
                lower[i][j] = diagonal.sqrt();
            } else {
                lower[i][j] = (a[i][j] - sum) / lower[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|k| lower[i][k] * y[k]).sum();
        y[i] = (b[i] - sum) / lower[i][i];
    }

    // Back substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|k| lower[k][i] * x[k]).sum();
        x[i] = (y[i] - sum) / lower[i][i];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_series_has_no_forecast() {
        assert_eq!(forecast_series(&[], 5), Err(ForecastError::NoObservations));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(11)]
    #[case(240)]
    fn test_forecast_has_horizon_length(#[case] len: usize) {
        let series: Vec<f64> = (0..len)
            .map(|i| 1.0 + 0.3 * (i as f64 * 0.7).sin())
            .collect();

        let forecast = forecast_series(&series, 5).unwrap();

        assert_eq!(forecast.len(), 5);
        assert!(forecast.iter().all(|value| value.is_finite()));
    }

    #[test]
    fn test_constant_series_forecasts_the_constant() {
        let series = vec![1.5; 240];

        let forecast = forecast_series(&series, 5).unwrap();

        assert_eq!(forecast, vec![1.5; 5]);
    }

    #[test]
    fn test_single_observation_is_repeated() {
        assert_eq!(forecast_series(&[0.8], 3).unwrap(), vec![0.8, 0.8, 0.8]);
    }

    #[test]
    fn test_linear_trend_is_continued() {
        let series: Vec<f64> = (0..50).map(|i| 2.0 + 0.1 * i as f64).collect();

        let forecast = forecast_series(&series, 3).unwrap();

        assert_close(forecast[0], 2.0 + 0.1 * 50.0);
        assert_close(forecast[1], 2.0 + 0.1 * 51.0);
        assert_close(forecast[2], 2.0 + 0.1 * 52.0);
    }

    #[test]
    fn test_recovers_first_order_autoregression() {
        // Increments follow w[t] = 0.9 * w[t - 1]
        let mut increments = vec![1.0];
        for _ in 1..30 {
            let last = increments[increments.len() - 1];
            increments.push(0.9 * last);
        }
        let mut series = vec![10.0];
        for w in &increments {
            let last = series[series.len() - 1];
            series.push(last + w);
        }

        let fitted = ArimaModel::new(1, 1).fit(&series).unwrap();
        assert_close(fitted.coefficients()[0], 0.9);

        let forecast = fitted.forecast(1).unwrap();
        let last_value = series[series.len() - 1];
        let last_increment = increments[increments.len() - 1];
        assert_close(forecast[0], last_value + 0.9 * last_increment);
    }

    #[test]
    fn test_non_finite_input_fails_to_fit() {
        let result = forecast_series(&[1.0, f64::NAN, 2.0], 5);
        assert!(matches!(result, Err(ForecastError::ModelFitFailed { .. })));
    }

    #[test]
    fn test_short_series_reduces_order() {
        let fitted = ArimaModel::default().fit(&[1.0, 2.0, 4.0, 7.0, 11.0]).unwrap();
        // Four increments support at most two lags
        assert_eq!(fitted.coefficients().len(), 2);
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let series: Vec<f64> = (0..120)
            .map(|i| 5.0 + (i as f64 * 0.3).cos() + 0.01 * i as f64)
            .collect();

        let first = forecast_series(&series, 5).unwrap();
        let second = forecast_series(&series, 5).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_second_order_differencing_integrates_twice() {
        // Quadratic series: second differences are constant
        let series: Vec<f64> = (0..40).map(|i| (i * i) as f64).collect();

        let forecast = ArimaModel::new(2, 2).fit(&series).unwrap().forecast(2).unwrap();

        assert_close(forecast[0], 1600.0);
        assert_close(forecast[1], 1681.0);
    }
}
