//! Temporal train/test splitting.

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};

/// Split off the last `test_size` observations as a test series.
///
/// Order is preserved: every training timestamp precedes every test
/// timestamp.
///
/// # Example
///
/// ```
/// use anofox_reduction::core::TimeSeries;
/// use anofox_reduction::utils::temporal_train_test_split;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let series = TimeSeries::univariate(
///     (0..10).map(|i| start + Duration::days(i)).collect(),
///     (0..10).map(|i| i as f64).collect(),
/// )
/// .unwrap();
///
/// let (train, test) = temporal_train_test_split(&series, 3).unwrap();
/// assert_eq!(train.len(), 7);
/// assert_eq!(test.values(), &[7.0, 8.0, 9.0]);
/// ```
pub fn temporal_train_test_split(
    series: &TimeSeries,
    test_size: usize,
) -> Result<(TimeSeries, TimeSeries)> {
    if test_size == 0 {
        return Err(ForecastError::InvalidParameter(
            "test_size must be positive".to_string(),
        ));
    }
    if test_size >= series.len() {
        return Err(ForecastError::InsufficientData {
            needed: test_size + 1,
            got: series.len(),
        });
    }
    let split = series.len() - test_size;
    Ok((series.slice(0, split)?, series.slice(split, series.len())?))
}
