//! Ordinary Least Squares (OLS) on a row-major design matrix.
//!
//! Features and targets are centered before the normal equations are
//! formed, so the intercept is recovered from the means and the Cholesky
//! factorisation works on a well-scaled cross-product matrix. Several target
//! columns share one factorisation.

use crate::error::{ForecastError, Result};

/// Relative ridge added to the diagonal of the centered cross-product matrix.
const RELATIVE_RIDGE: f64 = 1e-10;

/// OLS regression coefficients and intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct OLSResult {
    /// Regression coefficients (one per feature).
    pub coefficients: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
}

impl OLSResult {
    /// Predict a single observation.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: row.len(),
            });
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    /// Predict every row of a design matrix.
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        x.iter().map(|row| self.predict_row(row)).collect()
    }

    /// Get the number of features.
    pub fn num_features(&self) -> usize {
        self.coefficients.len()
    }
}

/// Fit `y = intercept + x @ coefficients`.
///
/// # Example
///
/// ```
/// use anofox_reduction::utils::ols_fit;
///
/// // y = 2 + 3 * x
/// let x = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
/// let y = vec![5.0, 8.0, 11.0, 14.0];
/// let fit = ols_fit(&x, &y).unwrap();
/// assert!((fit.intercept - 2.0).abs() < 1e-6);
/// assert!((fit.coefficients[0] - 3.0).abs() < 1e-6);
/// ```
pub fn ols_fit(x: &[Vec<f64>], y: &[f64]) -> Result<OLSResult> {
    let rows: Vec<Vec<f64>> = y.iter().map(|&v| vec![v]).collect();
    let mut fits = ols_fit_multi(x, &rows)?;
    fits.pop()
        .ok_or_else(|| ForecastError::ComputationError("OLS produced no solution".into()))
}

/// Fit one OLS model per target column against a shared design matrix.
///
/// `y[i][j]` is the target of observation `i` in column `j`.
pub fn ols_fit_multi(x: &[Vec<f64>], y: &[Vec<f64>]) -> Result<Vec<OLSResult>> {
    let n = x.len();
    if n == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if y.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: y.len(),
        });
    }

    let k = x[0].len();
    if let Some(bad) = x.iter().find(|row| row.len() != k) {
        return Err(ForecastError::DimensionMismatch {
            expected: k,
            got: bad.len(),
        });
    }
    let m = y[0].len();
    if m == 0 {
        return Err(ForecastError::InvalidParameter(
            "at least one target column is required".into(),
        ));
    }
    if let Some(bad) = y.iter().find(|row| row.len() != m) {
        return Err(ForecastError::DimensionMismatch {
            expected: m,
            got: bad.len(),
        });
    }

    let x_mean: Vec<f64> = (0..k)
        .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n as f64)
        .collect();
    let y_mean: Vec<f64> = (0..m)
        .map(|j| y.iter().map(|row| row[j]).sum::<f64>() / n as f64)
        .collect();

    // X'X and X'Y on centered data
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![vec![0.0; m]; k];
    let mut centered = vec![0.0; k];

    for (row, targets) in x.iter().zip(y) {
        for j in 0..k {
            centered[j] = row[j] - x_mean[j];
        }
        for i in 0..k {
            let xi = centered[i];
            for j in 0..=i {
                xtx[i][j] += xi * centered[j];
            }
            for (t, target) in targets.iter().enumerate() {
                xty[i][t] += xi * (target - y_mean[t]);
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            xtx[j][i] = xtx[i][j];
        }
    }

    if k == 0 {
        return Ok(y_mean
            .into_iter()
            .map(|intercept| OLSResult {
                coefficients: Vec::new(),
                intercept,
            })
            .collect());
    }

    let mean_diag = (0..k).map(|i| xtx[i][i]).sum::<f64>() / k as f64;
    let ridge = RELATIVE_RIDGE * mean_diag.max(1.0);
    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += ridge;
    }

    let l = cholesky(&xtx).ok_or_else(|| {
        ForecastError::ComputationError(
            "OLS regression failed: matrix not positive definite".into(),
        )
    })?;

    Ok((0..m)
        .map(|t| {
            let rhs: Vec<f64> = xty.iter().map(|row| row[t]).collect();
            let coefficients = cholesky_solve(&l, &rhs);
            let intercept = y_mean[t]
                - coefficients
                    .iter()
                    .zip(&x_mean)
                    .map(|(c, mu)| c * mu)
                    .sum::<f64>();
            OLSResult {
                coefficients,
                intercept,
            }
        })
        .collect())
}

/// Cholesky decomposition `A = L @ L'` of a symmetric positive definite matrix.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    Some(l)
}

/// Solve `L @ L' @ x = b` by forward and backward substitution.
fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();

    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ols_fit_simple_linear() {
        // y = 2 + 3*x
        let x: Vec<Vec<f64>> = (1..=5).map(|i| vec![i as f64]).collect();
        let y = vec![5.0, 8.0, 11.0, 14.0, 17.0];

        let result = ols_fit(&x, &y).unwrap();

        assert_relative_eq!(result.intercept, 2.0, epsilon = 1e-6);
        assert_eq!(result.num_features(), 1);
        assert_relative_eq!(result.coefficients[0], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn ols_fit_multiple_features() {
        // y = 1 + 2*x1 + 3*x2
        let x1 = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let x2 = [2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0];
        let x: Vec<Vec<f64>> = x1.iter().zip(&x2).map(|(a, b)| vec![*a, *b]).collect();
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .map(|(a, b)| 1.0 + 2.0 * a + 3.0 * b)
            .collect();

        let result = ols_fit(&x, &y).unwrap();

        assert_relative_eq!(result.intercept, 1.0, epsilon = 1e-6);
        assert_relative_eq!(result.coefficients[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(result.coefficients[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn ols_multi_matches_single_column_fits() {
        let x: Vec<Vec<f64>> = (0..10)
            .map(|i| vec![i as f64, ((i * 7) % 5) as f64])
            .collect();
        let y: Vec<Vec<f64>> = (0..10)
            .map(|i| vec![(i * i) as f64, (10 - i) as f64 * 0.5])
            .collect();

        let multi = ols_fit_multi(&x, &y).unwrap();
        for (t, fit) in multi.iter().enumerate() {
            let column: Vec<f64> = y.iter().map(|row| row[t]).collect();
            let single = ols_fit(&x, &column).unwrap();
            assert_eq!(&single, fit);
        }
    }

    #[test]
    fn ols_handles_collinear_features() {
        // Second feature is an exact shift of the first
        let x: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64, i as f64 + 1.0]).collect();
        let y: Vec<f64> = (0..8).map(|i| 10.0 + 2.0 * i as f64).collect();

        let result = ols_fit(&x, &y).unwrap();
        let prediction = result.predict_row(&[9.0, 10.0]).unwrap();

        assert_relative_eq!(prediction, 28.0, epsilon = 1e-4);
    }

    #[test]
    fn ols_rejects_bad_shapes() {
        assert!(matches!(
            ols_fit(&[], &[]),
            Err(ForecastError::InsufficientData { .. })
        ));
        assert!(matches!(
            ols_fit(&[vec![1.0], vec![2.0]], &[1.0]),
            Err(ForecastError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            ols_fit(&[vec![1.0], vec![2.0, 3.0]], &[1.0, 2.0]),
            Err(ForecastError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn predict_checks_feature_count() {
        let fit = OLSResult {
            coefficients: vec![1.0, 2.0],
            intercept: 0.5,
        };
        assert_relative_eq!(fit.predict_row(&[1.0, 1.0]).unwrap(), 3.5);
        assert!(fit.predict_row(&[1.0]).is_err());
    }
}
