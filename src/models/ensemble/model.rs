//! Ensemble forecasting methods.
//!
//! Combines the point forecasts of several named forecasters step by step
//! with a simple aggregation function.

use std::fmt;
use std::str::FromStr;

use crate::core::{Forecast, ForecastingHorizon, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{BoxedForecaster, Forecaster};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use statrs::statistics::Statistics;
use tracing::debug;

/// Function combining the forecasts of every constituent at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregation {
    /// Median of all forecasts; the mean of the two middle values for an
    /// even count.
    Median,
    /// Simple average of all forecasts.
    #[default]
    Mean,
    Min,
    Max,
}

impl Aggregation {
    pub const ALL: [Aggregation; 4] = [
        Aggregation::Median,
        Aggregation::Mean,
        Aggregation::Min,
        Aggregation::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Median => "median",
            Aggregation::Mean => "mean",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    /// Combine the values forecast for one step.
    pub fn aggregate(&self, values: &[f64]) -> f64 {
        match self {
            Aggregation::Mean => Statistics::mean(values.iter()),
            Aggregation::Min => Statistics::min(values.iter()),
            Aggregation::Max => Statistics::max(values.iter()),
            Aggregation::Median => {
                if values.is_empty() {
                    return f64::NAN;
                }
                let mut sorted = values.to_vec();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let n = sorted.len();
                if n % 2 == 0 {
                    (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
                } else {
                    sorted[n / 2]
                }
            }
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ForecastError::UnknownAggregation {
                name: s.to_string(),
                valid: Self::ALL
                    .iter()
                    .map(|a| a.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Ensemble forecaster that combines multiple named models.
///
/// Every constituent is fitted on the same series and horizon; predictions
/// are combined step by step with the configured aggregation. The
/// aggregation is given by name and only checked when predicting.
///
/// # Example
///
/// ```
/// use anofox_reduction::core::{ForecastingHorizon, TimeSeries};
/// use anofox_reduction::models::ensemble::Ensemble;
/// use anofox_reduction::models::reduction::{DirectForecaster, RecursiveForecaster};
/// use anofox_reduction::models::{BoxedForecaster, Forecaster};
/// use anofox_reduction::regression::LinearRegression;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps = (0..30).map(|i| start + Duration::days(i)).collect();
/// let values = (0..30).map(|i| 10.0 + (i % 5) as f64).collect();
/// let series = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let members: Vec<(String, BoxedForecaster)> = vec![
///     ("recursive".into(), Box::new(RecursiveForecaster::new(LinearRegression::new()).with_window_length(5))),
///     ("direct".into(), Box::new(DirectForecaster::new(LinearRegression::new()).with_window_length(5))),
/// ];
/// let mut ensemble = Ensemble::new(members).with_aggregation("median");
///
/// let fh = ForecastingHorizon::from_steps(2).unwrap();
/// ensemble.fit(&series, Some(&fh)).unwrap();
/// assert_eq!(ensemble.predict(&fh).unwrap().horizon(), 2);
/// ```
pub struct Ensemble {
    forecasters: Vec<(String, BoxedForecaster)>,
    aggregation: String,
    parallel: bool,
    is_fitted: bool,
}

impl Ensemble {
    /// Create a new ensemble with the given named models.
    pub fn new(forecasters: Vec<(String, BoxedForecaster)>) -> Self {
        Self {
            forecasters,
            aggregation: Aggregation::default().as_str().to_string(),
            parallel: false,
            is_fitted: false,
        }
    }

    /// Set the aggregation by name: one of median, mean, min, max.
    pub fn with_aggregation(mut self, aggregation: impl Into<String>) -> Self {
        self.aggregation = aggregation.into();
        self
    }

    /// Fit the constituents on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The configured aggregation name.
    pub fn aggregation(&self) -> &str {
        &self.aggregation
    }

    /// Names of the constituents, in order.
    pub fn names(&self) -> Vec<&str> {
        self.forecasters.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Get a constituent by name.
    pub fn get(&self, name: &str) -> Option<&BoxedForecaster> {
        self.forecasters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Get the number of models in the ensemble.
    pub fn model_count(&self) -> usize {
        self.forecasters.len()
    }

    fn combine(&self, aggregation: Aggregation, forecasts: &[Forecast]) -> Result<Forecast> {
        let first = forecasts.first().ok_or_else(|| {
            ForecastError::ComputationError("ensemble produced no forecasts".to_string())
        })?;
        if let Some(bad) = forecasts.iter().find(|f| f.offsets() != first.offsets()) {
            return Err(ForecastError::DimensionMismatch {
                expected: first.horizon(),
                got: bad.horizon(),
            });
        }

        let combined = (0..first.horizon())
            .map(|h| {
                let step: Vec<f64> = forecasts.iter().map(|f| f.values()[h]).collect();
                aggregation.aggregate(&step)
            })
            .collect();
        first.with_values(combined)
    }
}

impl Forecaster for Ensemble {
    fn fit(&mut self, series: &TimeSeries, horizon: Option<&ForecastingHorizon>) -> Result<()> {
        if self.forecasters.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "ensemble needs at least one forecaster".to_string(),
            ));
        }
        self.is_fitted = false;

        if self.parallel {
            self.forecasters
                .par_iter_mut()
                .map(|(_, forecaster)| forecaster.fit(series, horizon))
                .collect::<Result<Vec<()>>>()?;
        } else {
            for (_, forecaster) in self.forecasters.iter_mut() {
                forecaster.fit(series, horizon)?;
            }
        }

        debug!(
            forecasters = self.forecasters.len(),
            parallel = self.parallel,
            "fitted ensemble"
        );
        self.is_fitted = true;
        Ok(())
    }

    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Forecast> {
        if !self.is_fitted {
            return Err(ForecastError::FitRequired);
        }
        let aggregation: Aggregation = self.aggregation.parse()?;

        let forecasts = self
            .forecasters
            .iter()
            .map(|(_, forecaster)| forecaster.predict(horizon))
            .collect::<Result<Vec<Forecast>>>()?;

        debug!(%aggregation, forecasters = forecasts.len(), "combining forecasts");
        self.combine(aggregation, &forecasts)
    }

    fn predict_with_intervals(&self, horizon: &ForecastingHorizon, level: f64) -> Result<Forecast> {
        let _ = (horizon, level);
        Err(ForecastError::Unsupported(
            "ensemble forecasts do not combine prediction intervals".to_string(),
        ))
    }

    fn update(&mut self, series: &TimeSeries, update_params: bool) -> Result<()> {
        if !self.is_fitted {
            return Err(ForecastError::FitRequired);
        }
        for (_, forecaster) in self.forecasters.iter_mut() {
            forecaster.update(series, update_params)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "EnsembleForecaster"
    }

    fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.forecasters
            .first()
            .and_then(|(_, forecaster)| forecaster.cutoff())
    }
}
