//! Ordinary least squares linear regression.

use crate::error::{ForecastError, Result};
use crate::regression::Regressor;
use crate::utils::ols::{ols_fit_multi, OLSResult};

/// Linear regression with intercept, fitted by least squares.
///
/// Supports multi-output fitting (every target column is solved against the
/// same factorisation, so a multi-output fit equals independent single-output
/// fits) and incremental updates (new rows are appended to the retained
/// training data and the model is re-solved).
///
/// # Example
///
/// ```
/// use anofox_reduction::regression::{LinearRegression, Regressor};
///
/// let x = vec![vec![1.0], vec![2.0], vec![3.0]];
/// let y = vec![3.0, 5.0, 7.0];
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
/// let pred = model.predict(&[vec![4.0]]).unwrap();
/// assert!((pred[0] - 9.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    x: Vec<Vec<f64>>,
    y: Vec<Vec<f64>>,
    fits: Option<Vec<OLSResult>>,
    multioutput: bool,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.fits.is_some()
    }

    /// Coefficients of the first (or only) output.
    pub fn coefficients(&self) -> Option<&[f64]> {
        self.fits
            .as_ref()
            .and_then(|f| f.first())
            .map(|f| f.coefficients.as_slice())
    }

    /// Intercept of the first (or only) output.
    pub fn intercept(&self) -> Option<f64> {
        self.fits.as_ref().and_then(|f| f.first()).map(|f| f.intercept)
    }

    /// Number of retained training rows.
    pub fn n_observations(&self) -> usize {
        self.x.len()
    }

    fn solve(&mut self) -> Result<()> {
        self.fits = Some(ols_fit_multi(&self.x, &self.y)?);
        Ok(())
    }

    fn fitted(&self) -> Result<&[OLSResult]> {
        self.fits.as_deref().ok_or(ForecastError::FitRequired)
    }

    fn append_rows(&mut self, x: &[Vec<f64>], y: Vec<Vec<f64>>) -> Result<()> {
        if x.len() != y.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        self.x.extend_from_slice(x);
        self.y.extend(y);
        self.solve()
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        if x.len() != y.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        self.x = x.to_vec();
        self.y = y.iter().map(|&v| vec![v]).collect();
        self.multioutput = false;
        self.solve()
    }

    fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        let fits = self.fitted()?;
        if self.multioutput {
            return Err(ForecastError::InvalidParameter(
                "model was fitted on multiple outputs, use predict_multi".into(),
            ));
        }
        fits[0].predict(x)
    }

    fn name(&self) -> &str {
        "LinearRegression"
    }

    fn supports_multioutput(&self) -> bool {
        true
    }

    fn fit_multi(&mut self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<()> {
        if x.len() != y.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: x.len(),
                got: y.len(),
            });
        }
        self.x = x.to_vec();
        self.y = y.to_vec();
        self.multioutput = true;
        self.solve()
    }

    fn predict_multi(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        let fits = self.fitted()?;
        x.iter()
            .map(|row| fits.iter().map(|f| f.predict_row(row)).collect())
            .collect()
    }

    fn supports_update(&self) -> bool {
        true
    }

    fn update(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<()> {
        self.fitted()?;
        if self.multioutput {
            return Err(ForecastError::InvalidParameter(
                "model was fitted on multiple outputs, use update_multi".into(),
            ));
        }
        self.append_rows(x, y.iter().map(|&v| vec![v]).collect())
    }

    fn update_multi(&mut self, x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<()> {
        let outputs = self.fitted()?.len();
        if let Some(bad) = y.iter().find(|row| row.len() != outputs) {
            return Err(ForecastError::DimensionMismatch {
                expected: outputs,
                got: bad.len(),
            });
        }
        self.append_rows(x, y.to_vec())
    }
}
