//! Forecaster trait defining the common interface for all models.

use crate::core::{Forecast, ForecastingHorizon, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Common interface for all forecasting models.
///
/// A forecaster is fitted on a series, which fixes its cutoff (the last
/// observed timestamp); horizons passed to `predict` are interpreted
/// relative to that cutoff. Strategies that train one model per horizon
/// step need the horizon already at fit time.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the time series data.
    fn fit(&mut self, series: &TimeSeries, horizon: Option<&ForecastingHorizon>) -> Result<()>;

    /// Generate point predictions for the given horizon.
    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Forecast>;

    /// Generate predictions with intervals at the given coverage level.
    fn predict_with_intervals(&self, horizon: &ForecastingHorizon, level: f64) -> Result<Forecast> {
        let _ = (horizon, level);
        Err(ForecastError::Unsupported(format!(
            "{} does not produce prediction intervals",
            self.name()
        )))
    }

    /// Incorporate new observations.
    ///
    /// With `update_params` false only the stored series (and so the cutoff)
    /// is refreshed; fitted parameters are left untouched.
    fn update(&mut self, series: &TimeSeries, update_params: bool) -> Result<()>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;

    /// Last timestamp seen by `fit` or `update`.
    fn cutoff(&self) -> Option<DateTime<Utc>>;
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use anofox_reduction::models::{BoxedForecaster, Forecaster};
/// use anofox_reduction::models::reduction::RecursiveForecaster;
/// use anofox_reduction::regression::LinearRegression;
///
/// let model: BoxedForecaster = Box::new(RecursiveForecaster::new(LinearRegression::new()));
/// assert_eq!(model.name(), "RecursiveRegressionForecaster");
/// assert!(!model.is_fitted());
/// ```
pub type BoxedForecaster = Box<dyn Forecaster + Send>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reduction::RecursiveForecaster;
    use crate::regression::LinearRegression;
    use chrono::{Duration, TimeZone};

    fn make_test_series(n: usize) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..n).map(|i| start + Duration::days(i as i64)).collect();
        let values: Vec<f64> = (0..n).map(|i| 10.0 + (i % 4) as f64).collect();
        TimeSeries::univariate(timestamps, values).unwrap()
    }

    #[test]
    fn test_boxed_forecaster_lifecycle() {
        let mut model: BoxedForecaster =
            Box::new(RecursiveForecaster::new(LinearRegression::new()).with_window_length(4));
        assert!(!model.is_fitted());
        assert!(model.cutoff().is_none());

        let series = make_test_series(24);
        model.fit(&series, None).unwrap();

        assert!(model.is_fitted());
        assert_eq!(model.cutoff(), series.last_timestamp());
        let fh = ForecastingHorizon::from_steps(3).unwrap();
        assert_eq!(model.predict(&fh).unwrap().horizon(), 3);
    }

    #[test]
    fn test_intervals_unsupported_by_default() {
        let mut model = RecursiveForecaster::new(LinearRegression::new()).with_window_length(4);
        model.fit(&make_test_series(24), None).unwrap();

        let fh = ForecastingHorizon::from_steps(2).unwrap();
        assert!(matches!(
            model.predict_with_intervals(&fh, 0.9),
            Err(ForecastError::Unsupported(_))
        ));
    }
}
