//! Point forecast loss functions.
//!
//! All losses are lower-is-better and returned as fractions, so a sMAPE of
//! `0.05` means five percent.

use crate::error::{ForecastError, Result};
use statrs::statistics::Statistics;

fn check_pair(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}

fn check_no_zero_actuals(actual: &[f64], metric: &str) -> Result<()> {
    if actual.contains(&0.0) {
        return Err(ForecastError::ComputationError(format!(
            "{} is undefined when actual values contain zeros",
            metric
        )));
    }
    Ok(())
}

/// In-sample errors of the seasonal naive forecast, `y[t] - y[t - sp]`.
fn naive_errors(y_train: &[f64], sp: usize) -> Result<Vec<f64>> {
    if sp == 0 {
        return Err(ForecastError::InvalidParameter(
            "seasonal period must be positive".to_string(),
        ));
    }
    if y_train.len() <= sp {
        return Err(ForecastError::InsufficientData {
            needed: sp + 1,
            got: y_train.len(),
        });
    }
    Ok(y_train
        .iter()
        .skip(sp)
        .zip(y_train.iter())
        .map(|(curr, prev)| curr - prev)
        .collect())
}

/// Mean absolute percentage error.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    check_no_zero_actuals(actual, "MAPE")?;
    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .mean())
}

/// Symmetric mean absolute percentage error.
///
/// Steps where both actual and prediction are zero contribute zero.
pub fn smape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .mean())
}

/// Mean absolute deviation between actual and predicted values.
pub fn mad(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    Ok(actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).mean())
}

/// Geometric mean absolute error.
///
/// Any exact prediction drives the loss to zero.
pub fn gmae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    let errors: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .collect();
    if errors.contains(&0.0) {
        return Ok(0.0);
    }
    Ok(errors.geometric_mean())
}

/// Root mean squared percentage error.
pub fn rmspe(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_pair(actual, predicted)?;
    check_no_zero_actuals(actual, "RMSPE")?;
    Ok(actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).powi(2))
        .mean()
        .sqrt())
}

/// Mean absolute scaled error.
///
/// The forecast MAE is scaled by the in-sample MAE of the seasonal naive
/// forecast with period `sp` on `y_train`.
pub fn mase(actual: &[f64], predicted: &[f64], y_train: &[f64], sp: usize) -> Result<f64> {
    check_pair(actual, predicted)?;
    let scale = naive_errors(y_train, sp)?.iter().map(|e| e.abs()).mean();
    if scale == 0.0 {
        return Err(ForecastError::ComputationError(
            "MASE is undefined for a training series the naive forecast fits exactly".to_string(),
        ));
    }
    Ok(mad(actual, predicted)? / scale)
}

/// Root mean squared scaled error.
///
/// Like [`mase`] with squared errors on both sides.
pub fn rmsse(actual: &[f64], predicted: &[f64], y_train: &[f64], sp: usize) -> Result<f64> {
    check_pair(actual, predicted)?;
    let scale = naive_errors(y_train, sp)?.iter().map(|e| e * e).mean();
    if scale == 0.0 {
        return Err(ForecastError::ComputationError(
            "RMSSE is undefined for a training series the naive forecast fits exactly"
                .to_string(),
        ));
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .mean();
    Ok((mse / scale).sqrt())
}
