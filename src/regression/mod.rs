//! Tabular regressors consumed by the reduction strategies.
//!
//! A reduction forecaster only needs a model that can be fitted on a table
//! of feature rows and then predict one value per row. Multi-output fitting
//! and incremental updates are optional capabilities with failing defaults.

mod linear;
mod tabularize;

pub use linear::LinearRegression;
pub use tabularize::{tabularize, Panel, SeriesRegressor, Tabularizer, WindowedRegressor};

use crate::error::{ForecastError, Result};

/// A regression model over row-major feature tables.
///
/// Implementors are cloned by the reduction strategies, one fresh copy per
/// horizon step where needed, so a caller-supplied template is never fitted
/// in place.
pub trait Regressor: Clone + Send {
    /// Fit the model on feature rows `x` and targets `y`.
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()>;

    /// Predict one value per feature row.
    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Whether `fit_multi`/`predict_multi` are implemented.
    fn supports_multioutput(&self) -> bool {
        false
    }

    /// Fit on a target matrix, `y[i]` holding every output of row `i`.
    fn fit_multi(&mut self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<()> {
        let _ = (x, y);
        Err(ForecastError::Unsupported(format!(
            "{} does not support multi-output regression",
            self.name()
        )))
    }

    /// Predict every output for each feature row.
    fn predict_multi(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let _ = x;
        Err(ForecastError::Unsupported(format!(
            "{} does not support multi-output regression",
            self.name()
        )))
    }

    /// Whether `update` can refine a fitted model with new rows.
    fn supports_update(&self) -> bool {
        false
    }

    /// Refine a fitted model with additional rows.
    fn update(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        let _ = (x, y);
        Err(ForecastError::Unsupported(format!(
            "{} does not support incremental updates",
            self.name()
        )))
    }

    /// Refine a fitted multi-output model with additional rows.
    fn update_multi(&mut self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<()> {
        let _ = (x, y);
        Err(ForecastError::Unsupported(format!(
            "{} does not support incremental updates",
            self.name()
        )))
    }
}
