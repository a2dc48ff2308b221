//! Forecasting horizon: the future steps at which a forecast is required.

use crate::core::Frequency;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// How the horizon steps are expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HorizonKind {
    /// Step offsets relative to the cutoff (1 = first step after the last observation).
    Relative(Vec<i64>),
    /// Absolute future timestamps, resolved against the cutoff and the series frequency.
    Absolute(Vec<DateTime<Utc>>),
}

/// Ordered set of future steps to forecast.
///
/// The order of the steps defines the order of the returned predictions.
///
/// # Example
///
/// ```
/// use anofox_reduction::core::ForecastingHorizon;
///
/// let fh = ForecastingHorizon::relative(vec![3, 1, 2]).unwrap();
/// assert_eq!(fh.len(), 3);
///
/// assert!(ForecastingHorizon::relative(vec![1, 1]).is_err());
/// assert!(ForecastingHorizon::relative(vec![0, 1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastingHorizon {
    kind: HorizonKind,
}

impl ForecastingHorizon {
    /// Horizon of relative offsets. Offsets must be positive and unique.
    pub fn relative(offsets: Vec<i64>) -> Result<Self> {
        validate_offsets(&offsets)?;
        Ok(Self {
            kind: HorizonKind::Relative(offsets),
        })
    }

    /// Horizon of the first `steps` steps after the cutoff.
    pub fn from_steps(steps: usize) -> Result<Self> {
        Self::relative((1..=steps as i64).collect())
    }

    /// Horizon of absolute timestamps. Timestamps must be unique.
    ///
    /// Positivity relative to the cutoff is checked when the horizon is resolved.
    pub fn absolute(timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(ForecastError::InvalidHorizon(
                "horizon must contain at least one step".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(timestamps.len());
        if let Some(dup) = timestamps.iter().find(|t| !seen.insert(**t)) {
            return Err(ForecastError::InvalidHorizon(format!(
                "duplicate timestamp {}",
                dup
            )));
        }
        Ok(Self {
            kind: HorizonKind::Absolute(timestamps),
        })
    }

    pub fn kind(&self) -> &HorizonKind {
        &self.kind
    }

    pub fn is_relative(&self) -> bool {
        matches!(self.kind, HorizonKind::Relative(_))
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        match &self.kind {
            HorizonKind::Relative(offsets) => offsets.len(),
            HorizonKind::Absolute(timestamps) => timestamps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the horizon into positive step offsets, in horizon order.
    ///
    /// Absolute timestamps must lie a whole number of `frequency` periods
    /// after `cutoff`; month frequencies are counted on the calendar.
    pub fn to_relative(
        &self,
        cutoff: DateTime<Utc>,
        frequency: Option<Frequency>,
    ) -> Result<Vec<usize>> {
        let offsets = match &self.kind {
            HorizonKind::Relative(offsets) => offsets.clone(),
            HorizonKind::Absolute(timestamps) => {
                let freq = frequency.ok_or_else(|| {
                    ForecastError::InvalidHorizon(
                        "absolute horizon requires a known series frequency".to_string(),
                    )
                })?;
                timestamps
                    .iter()
                    .map(|t| {
                        freq.steps_between(cutoff, *t).ok_or_else(|| {
                            ForecastError::InvalidHorizon(format!(
                                "timestamp {} is not aligned to the series frequency",
                                t
                            ))
                        })
                    })
                    .collect::<Result<Vec<i64>>>()?
            }
        };
        validate_offsets(&offsets)?;
        Ok(offsets.into_iter().map(|o| o as usize).collect())
    }
}

/// Check that offsets are non-empty, strictly positive and unique.
pub fn validate_offsets(offsets: &[i64]) -> Result<()> {
    if offsets.is_empty() {
        return Err(ForecastError::InvalidHorizon(
            "horizon must contain at least one step".to_string(),
        ));
    }
    if let Some(bad) = offsets.iter().find(|&&o| o <= 0) {
        return Err(ForecastError::InvalidHorizon(format!(
            "offsets must be positive relative to the cutoff, got {}",
            bad
        )));
    }
    let mut seen = HashSet::with_capacity(offsets.len());
    if let Some(dup) = offsets.iter().find(|o| !seen.insert(**o)) {
        return Err(ForecastError::InvalidHorizon(format!(
            "duplicate offset {}",
            dup
        )));
    }
    Ok(())
}

/// Check that a per-step regressor list matches the horizon length.
pub fn check_regressor_count(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(ForecastError::RegressorCountMismatch { expected, got });
    }
    Ok(())
}
