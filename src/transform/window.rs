//! Sliding-window tabularisation of a series.
//!
//! Turns a 1-D series into a table of fixed-length feature windows and the
//! values that follow each window, the training data of a reduction forecaster.

use crate::error::{ForecastError, Result};

/// Feature windows with one target column per requested offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingTable {
    window_length: usize,
    offsets: Vec<usize>,
    /// features[i] = values[i..i + window_length]
    features: Vec<Vec<f64>>,
    /// targets[i][j] = value `offsets[j]` steps past the end of window i
    targets: Vec<Vec<f64>>,
}

impl TrainingTable {
    /// Number of (window, target) rows.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Target offsets, one per target column.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Target rows (one entry per offset).
    pub fn target_rows(&self) -> &[Vec<f64>] {
        &self.targets
    }

    /// Target values of one offset column.
    pub fn target_column(&self, column: usize) -> Vec<f64> {
        self.targets.iter().map(|row| row[column]).collect()
    }

    /// Drop the first `first_row` rows.
    pub fn skip(mut self, first_row: usize) -> Self {
        let first_row = first_row.min(self.features.len());
        self.features.drain(..first_row);
        self.targets.drain(..first_row);
        self
    }
}

/// Single-step windows: row i is `values[i..i+W]`, target `values[i+W]`.
///
/// Produces exactly `L - W` rows.
///
/// # Example
///
/// ```
/// use anofox_reduction::transform::sliding_windows;
///
/// let table = sliding_windows(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.features()[1], vec![2.0, 3.0, 4.0]);
/// assert_eq!(table.target_column(0), vec![4.0, 5.0]);
/// ```
pub fn sliding_windows(values: &[f64], window_length: usize) -> Result<TrainingTable> {
    sliding_windows_multi(values, window_length, &[1])
}

/// Multi-target windows for the given step offsets.
///
/// Only windows for which every offset is observed are kept, which gives
/// `L - W - max(offsets) + 1` rows.
pub fn sliding_windows_multi(
    values: &[f64],
    window_length: usize,
    offsets: &[usize],
) -> Result<TrainingTable> {
    if window_length == 0 {
        return Err(ForecastError::InvalidParameter(
            "window_length must be positive".to_string(),
        ));
    }
    let max_offset = offsets.iter().copied().max().ok_or_else(|| {
        ForecastError::InvalidParameter("at least one target offset is required".to_string())
    })?;
    if offsets.contains(&0) {
        return Err(ForecastError::InvalidParameter(
            "target offsets must be positive".to_string(),
        ));
    }

    let needed = window_length + max_offset;
    if values.len() < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: values.len(),
        });
    }

    let n_rows = values.len() - needed + 1;
    let mut features = Vec::with_capacity(n_rows);
    let mut targets = Vec::with_capacity(n_rows);

    for start in 0..n_rows {
        let end = start + window_length;
        features.push(values[start..end].to_vec());
        targets.push(offsets.iter().map(|&o| values[end + o - 1]).collect());
    }

    Ok(TrainingTable {
        window_length,
        offsets: offsets.to_vec(),
        features,
        targets,
    })
}

/// The final `window_length` values, the window a forecast starts from.
pub fn last_window(values: &[f64], window_length: usize) -> Result<&[f64]> {
    if window_length == 0 {
        return Err(ForecastError::InvalidParameter(
            "window_length must be positive".to_string(),
        ));
    }
    if values.len() < window_length {
        return Err(ForecastError::InsufficientData {
            needed: window_length,
            got: values.len(),
        });
    }
    Ok(&values[values.len() - window_length..])
}
