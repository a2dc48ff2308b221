//! TimeSeries data structure for representing temporal data.

use crate::core::Frequency;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// A univariate time series with timestamps and values.
///
/// Optional exogenous columns are carried alongside the target values so that
/// composite forecasters can forward them to their constituents unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    frequency: Option<Frequency>,
    exogenous: HashMap<String, Vec<f64>>,
}

/// Builder for constructing TimeSeries.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    frequency: Option<Frequency>,
    exogenous: HashMap<String, Vec<f64>>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = values;
        self
    }

    /// Explicit spacing: a `Duration` or a calendar `Frequency::Months`.
    pub fn frequency(mut self, freq: impl Into<Frequency>) -> Self {
        self.frequency = Some(freq.into());
        self
    }

    /// Attach a named exogenous column.
    pub fn exogenous(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.exogenous.insert(name.into(), values);
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        TimeSeries::new(self.timestamps, self.values, self.frequency, self.exogenous)
    }
}

impl TimeSeries {
    /// Create a new TimeSeries with full configuration.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
        frequency: Option<Frequency>,
        exogenous: HashMap<String, Vec<f64>>,
    ) -> Result<Self> {
        validate_timestamps(&timestamps)?;

        if values.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }

        for column in exogenous.values() {
            if column.len() != timestamps.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: timestamps.len(),
                    got: column.len(),
                });
            }
        }

        if let Some(freq) = frequency {
            freq.validate()?;
        }

        Ok(Self {
            timestamps,
            values,
            frequency,
            exogenous,
        })
    }

    /// Create a simple univariate time series.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::new(timestamps, values, None, HashMap::new())
    }

    pub fn builder() -> TimeSeriesBuilder {
        TimeSeriesBuilder::new()
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Timestamp of the last observation, the forecasting cutoff.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Explicitly configured frequency, if any.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    pub fn has_exogenous(&self) -> bool {
        !self.exogenous.is_empty()
    }

    pub fn exogenous(&self, name: &str) -> Option<&[f64]> {
        self.exogenous.get(name).map(|v| v.as_slice())
    }

    pub fn exogenous_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exogenous.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Extract a slice of the time series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "slice end {} exceeds series length {}",
                end,
                self.len()
            )));
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
            frequency: self.frequency,
            exogenous: self
                .exogenous
                .iter()
                .map(|(name, column)| (name.clone(), column[start..end].to_vec()))
                .collect(),
        })
    }

    /// Append the observations of `other` that lie strictly after this series' end.
    ///
    /// Returns the number of appended observations. Exogenous columns must
    /// match by name.
    pub fn append(&mut self, other: &TimeSeries) -> Result<usize> {
        if self.exogenous_names() != other.exogenous_names() {
            return Err(ForecastError::InvalidParameter(
                "exogenous columns differ between stored and new series".to_string(),
            ));
        }

        let start = match self.last_timestamp() {
            Some(cutoff) => other.timestamps.partition_point(|t| *t <= cutoff),
            None => 0,
        };
        let added = other.len() - start;

        self.timestamps
            .extend_from_slice(&other.timestamps[start..]);
        self.values.extend_from_slice(&other.values[start..]);
        for (name, column) in self.exogenous.iter_mut() {
            if let Some(new_column) = other.exogenous.get(name) {
                column.extend_from_slice(&new_column[start..]);
            }
        }
        if self.frequency.is_none() {
            self.frequency = other.frequency;
        }

        Ok(added)
    }

    /// Infer frequency from timestamps.
    ///
    /// Returns the modal spacing between consecutive timestamps; fails when
    /// the modal spacing covers less than `tolerance` of all gaps. Gaps of
    /// whole calendar months are counted in months, so monthly data gets a
    /// `Frequency::Months` rather than an average month length.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Frequency> {
        if self.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }
        let total_count = self.len() - 1;

        let mut month_counts: HashMap<u32, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            if let Some(months) = Frequency::month_step(w[0], w[1]) {
                *month_counts.entry(months).or_insert(0) += 1;
            }
        }
        if let Some((&months, &count)) = month_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        {
            if count as f64 / total_count as f64 >= tolerance {
                return Ok(Frequency::Months(months));
            }
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        // Ties resolve to the smaller spacing so the result is deterministic.
        let (modal_diff, modal_count) = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .map(|(&diff, &count)| (diff, count))
            .ok_or_else(|| ForecastError::TimestampError("empty spacing data".to_string()))?;

        let modal_ratio = modal_count as f64 / total_count as f64;

        if modal_ratio < tolerance {
            return Err(ForecastError::TimestampError(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Frequency::Fixed(Duration::seconds(modal_diff)))
    }

    /// The configured frequency, falling back to the inferred modal spacing.
    pub fn resolved_frequency(&self) -> Option<Frequency> {
        self.frequency.or_else(|| self.infer_frequency(0.5).ok())
    }
}

fn validate_timestamps(timestamps: &[DateTime<Utc>]) -> Result<()> {
    if timestamps.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ForecastError::TimestampError(
            "timestamps must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}
