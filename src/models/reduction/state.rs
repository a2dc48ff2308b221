//! Series bookkeeping shared by the reduction strategies.

use crate::core::{Forecast, ForecastingHorizon, Frequency, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::reduction::Strategy;
use chrono::{DateTime, Utc};

/// The observed series a fitted reduction forecaster predicts from.
#[derive(Debug, Clone)]
pub(crate) struct SeriesState {
    series: TimeSeries,
    frequency: Option<Frequency>,
}

/// Outcome of refreshing the stored series with new observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refresh {
    /// Observations after the old cutoff were appended.
    Appended { previous_len: usize, added: usize },
    /// The new series started at or before the stored one and replaced it.
    Replaced,
}

impl SeriesState {
    pub(crate) fn new(series: &TimeSeries) -> Result<Self> {
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        reject_exogenous(series)?;
        Ok(Self {
            series: series.clone(),
            frequency: series.resolved_frequency(),
        })
    }

    pub(crate) fn values(&self) -> &[f64] {
        self.series.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.series.len()
    }

    pub(crate) fn cutoff(&self) -> DateTime<Utc> {
        // non-empty by construction
        self.series.timestamps()[self.series.len() - 1]
    }

    /// Resolve a horizon to positive step offsets past the cutoff.
    pub(crate) fn resolve(&self, horizon: &ForecastingHorizon) -> Result<Vec<usize>> {
        horizon.to_relative(self.cutoff(), self.frequency)
    }

    /// Index predictions by their offsets and, when known, timestamps.
    pub(crate) fn forecast(&self, offsets: Vec<usize>, values: Vec<f64>) -> Result<Forecast> {
        Forecast::from_offsets(offsets, values)?.with_index(self.cutoff(), self.frequency)
    }

    pub(crate) fn refresh(&mut self, series: &TimeSeries) -> Result<Refresh> {
        let previous_len = self.series.len();
        if series.is_empty() {
            return Ok(Refresh::Appended {
                previous_len,
                added: 0,
            });
        }
        reject_exogenous(series)?;

        if series.timestamps()[0] <= self.series.timestamps()[0] {
            *self = Self::new(series)?;
            return Ok(Refresh::Replaced);
        }

        let added = self.series.append(series)?;
        if self.frequency.is_none() {
            self.frequency = self.series.resolved_frequency();
        }
        Ok(Refresh::Appended {
            previous_len,
            added,
        })
    }
}

fn reject_exogenous(series: &TimeSeries) -> Result<()> {
    if series.has_exogenous() {
        return Err(ForecastError::Unsupported(
            "reduction forecasters do not use exogenous columns".to_string(),
        ));
    }
    Ok(())
}

/// The fit-time horizon the per-step strategies cannot do without.
pub(crate) fn require_fit_horizon(
    strategy: Strategy,
    horizon: Option<&ForecastingHorizon>,
) -> Result<&ForecastingHorizon> {
    horizon.ok_or_else(|| {
        ForecastError::InvalidParameter(format!(
            "the {} strategy requires the forecasting horizon at fit time",
            strategy
        ))
    })
}

/// Map requested offsets to the positions of the fitted ones.
pub(crate) fn bind_offsets(fitted: &[usize], requested: &[usize]) -> Result<Vec<usize>> {
    requested
        .iter()
        .map(|offset| {
            fitted.iter().position(|f| f == offset).ok_or_else(|| {
                ForecastError::InvalidHorizon(format!(
                    "step {} was not part of the horizon passed to fit ({:?})",
                    offset, fitted
                ))
            })
        })
        .collect()
}

/// First training row whose targets include an observation at or after
/// `previous_len`.
pub(crate) fn first_new_row(previous_len: usize, window_length: usize, max_offset: usize) -> usize {
    (previous_len + 1).saturating_sub(window_length + max_offset)
}
