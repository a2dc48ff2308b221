//! Time-series regressors and their bridge to tabular regression.
//!
//! A series regressor consumes a panel: a collection of instances, each made
//! of one or more channels of equal-length sub-series. Reduction windows are
//! single-channel instances. [`Tabularizer`] turns any tabular [`Regressor`]
//! into a series regressor by flattening each instance into one row, and
//! [`WindowedRegressor`] presents a series regressor to the reduction
//! strategies as a plain [`Regressor`].

use crate::error::{ForecastError, Result};
use crate::regression::Regressor;

/// Panel data: `panel[instance][channel][timepoint]`.
pub type Panel = [Vec<Vec<f64>>];

/// A regression model over panels of sub-series.
pub trait SeriesRegressor: Clone + Send {
    fn fit(&mut self, x: &Panel, y: &[f64]) -> Result<()>;

    fn predict(&self, x: &Panel) -> Result<Vec<f64>>;

    fn name(&self) -> &str;

    fn supports_multioutput(&self) -> bool {
        false
    }

    fn fit_multi(&mut self, x: &Panel, y: &[Vec<f64>]) -> Result<()> {
        let _ = (x, y);
        Err(ForecastError::Unsupported(format!(
            "{} does not support multi-output regression",
            self.name()
        )))
    }

    fn predict_multi(&self, x: &Panel) -> Result<Vec<Vec<f64>>> {
        let _ = x;
        Err(ForecastError::Unsupported(format!(
            "{} does not support multi-output regression",
            self.name()
        )))
    }

    fn supports_update(&self) -> bool {
        false
    }

    fn update(&mut self, x: &Panel, y: &[f64]) -> Result<()> {
        let _ = (x, y);
        Err(ForecastError::Unsupported(format!(
            "{} does not support incremental updates",
            self.name()
        )))
    }

    fn update_multi(&mut self, x: &Panel, y: &[Vec<f64>]) -> Result<()> {
        let _ = (x, y);
        Err(ForecastError::Unsupported(format!(
            "{} does not support incremental updates",
            self.name()
        )))
    }
}

/// Flattens every panel instance (channels concatenated) into a table row
/// before delegating to a tabular regressor.
#[derive(Debug, Clone)]
pub struct Tabularizer<R> {
    inner: R,
    name: String,
}

impl<R: Regressor> Tabularizer<R> {
    pub fn new(inner: R) -> Self {
        let name = format!("Tabularizer({})", inner.name());
        Self { inner, name }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

/// Flatten a panel into row-major table form.
pub fn tabularize(x: &Panel) -> Vec<Vec<f64>> {
    x.iter()
        .map(|instance| instance.iter().flatten().copied().collect())
        .collect()
}

impl<R: Regressor> SeriesRegressor for Tabularizer<R> {
    fn fit(&mut self, x: &Panel, y: &[f64]) -> Result<()> {
        self.inner.fit(&tabularize(x), y)
    }

    fn predict(&self, x: &Panel) -> Result<Vec<f64>> {
        self.inner.predict(&tabularize(x))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn supports_multioutput(&self) -> bool {
        self.inner.supports_multioutput()
    }

    fn fit_multi(&mut self, x: &Panel, y: &[Vec<f64>]) -> Result<()> {
        self.inner.fit_multi(&tabularize(x), y)
    }

    fn predict_multi(&self, x: &Panel) -> Result<Vec<Vec<f64>>> {
        self.inner.predict_multi(&tabularize(x))
    }

    fn supports_update(&self) -> bool {
        self.inner.supports_update()
    }

    fn update(&mut self, x: &Panel, y: &[f64]) -> Result<()> {
        self.inner.update(&tabularize(x), y)
    }

    fn update_multi(&mut self, x: &Panel, y: &[Vec<f64>]) -> Result<()> {
        self.inner.update_multi(&tabularize(x), y)
    }
}

/// Adapts a [`SeriesRegressor`] to the [`Regressor`] interface by treating
/// every feature row as a one-channel sub-series.
#[derive(Debug, Clone)]
pub struct WindowedRegressor<S> {
    inner: S,
}

impl<S: SeriesRegressor> WindowedRegressor<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

fn to_panel(x: &[Vec<f64>]) -> Vec<Vec<Vec<f64>>> {
    x.iter().map(|row| vec![row.clone()]).collect()
}

impl<S: SeriesRegressor> Regressor for WindowedRegressor<S> {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        self.inner.fit(&to_panel(x), y)
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        self.inner.predict(&to_panel(x))
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports_multioutput(&self) -> bool {
        self.inner.supports_multioutput()
    }

    fn fit_multi(&mut self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<()> {
        self.inner.fit_multi(&to_panel(x), y)
    }

    fn predict_multi(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        self.inner.predict_multi(&to_panel(x))
    }

    fn supports_update(&self) -> bool {
        self.inner.supports_update()
    }

    fn update(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        self.inner.update(&to_panel(x), y)
    }

    fn update_multi(&mut self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<()> {
        self.inner.update_multi(&to_panel(x), y)
    }
}
