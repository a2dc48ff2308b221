//! Forecast result structure for holding predictions.

use crate::core::Frequency;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// A point forecast aligned to a forecasting horizon.
///
/// Values are stored in the order in which the horizon listed its steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    /// Step offsets relative to the cutoff.
    offsets: Vec<usize>,
    /// Point predictions, one per offset.
    values: Vec<f64>,
    /// Timestamps of the predicted steps, when the series frequency is known.
    timestamps: Option<Vec<DateTime<Utc>>>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from offsets and their predicted values.
    pub fn from_offsets(offsets: Vec<usize>, values: Vec<f64>) -> Result<Self> {
        if offsets.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: offsets.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            offsets,
            values,
            timestamps: None,
        })
    }

    /// Attach the timestamps lying `offset` periods of `frequency` after `cutoff`.
    ///
    /// Fails with `TimestampError` when a step leaves the representable date range.
    pub fn with_index(
        mut self,
        cutoff: DateTime<Utc>,
        frequency: Option<Frequency>,
    ) -> Result<Self> {
        self.timestamps = match frequency {
            Some(freq) => Some(
                self.offsets
                    .iter()
                    .map(|&o| {
                        freq.advance(cutoff, o).ok_or_else(|| {
                            ForecastError::TimestampError(format!(
                                "step {} after {} is out of the supported date range",
                                o, cutoff
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };
        Ok(self)
    }

    /// A forecast on the same index holding other values.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.values.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            offsets: self.offsets.clone(),
            values,
            timestamps: self.timestamps.clone(),
        })
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Predicted value for a step offset.
    pub fn value_at(&self, offset: usize) -> Option<f64> {
        self.offsets
            .iter()
            .position(|&o| o == offset)
            .map(|i| self.values[i])
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone};

    #[test]
    fn forecast_empty_state() {
        let forecast = Forecast::new();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
        assert!(forecast.timestamps().is_none());
    }

    #[test]
    fn forecast_from_offsets_keeps_order() {
        let forecast = Forecast::from_offsets(vec![3, 1], vec![30.0, 10.0]).unwrap();
        assert_eq!(forecast.horizon(), 2);
        assert_eq!(forecast.values(), &[30.0, 10.0]);
        assert_eq!(forecast.value_at(1), Some(10.0));
        assert_eq!(forecast.value_at(2), None);
    }

    #[test]
    fn forecast_rejects_mismatched_lengths() {
        assert!(matches!(
            Forecast::from_offsets(vec![1, 2], vec![1.0]),
            Err(ForecastError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn forecast_index_from_frequency() {
        let cutoff = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let forecast = Forecast::from_offsets(vec![2, 1], vec![2.0, 1.0])
            .unwrap()
            .with_index(cutoff, Some(Duration::days(1).into()))
            .unwrap();

        let ts = forecast.timestamps().unwrap();
        assert_eq!(ts[0], cutoff + Duration::days(2));
        assert_eq!(ts[1], cutoff + Duration::days(1));

        let unindexed = Forecast::from_offsets(vec![1], vec![1.0])
            .unwrap()
            .with_index(cutoff, None)
            .unwrap();
        assert!(unindexed.timestamps().is_none());
    }

    #[test]
    fn forecast_index_uses_calendar_months() {
        let cutoff = Utc.with_ymd_and_hms(1951, 12, 1, 0, 0, 0).unwrap();
        let forecast = Forecast::from_offsets(vec![1, 2, 3], vec![0.0; 3])
            .unwrap()
            .with_index(cutoff, Some(Frequency::months(1)))
            .unwrap();

        let months: Vec<_> = forecast.timestamps().unwrap().iter().map(|t| t.month()).collect();
        assert_eq!(months, vec![1, 2, 3]);
        assert!(forecast.timestamps().unwrap().iter().all(|t| t.day() == 1));
    }

    #[test]
    fn forecast_index_out_of_range_is_an_error() {
        let cutoff = Utc.with_ymd_and_hms(262_142, 1, 1, 0, 0, 0).unwrap();
        let result = Forecast::from_offsets(vec![800], vec![1.0])
            .unwrap()
            .with_index(cutoff, Some(Duration::days(1).into()));
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));

        let huge = Forecast::from_offsets(vec![usize::MAX], vec![1.0])
            .unwrap()
            .with_index(cutoff, Some(Duration::seconds(1).into()));
        assert!(huge.is_err());
    }
}
