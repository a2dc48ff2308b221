//! Recursive reduction: one single-step regressor rolled forward on its own
//! predictions.

use std::collections::VecDeque;

use crate::core::{Forecast, ForecastingHorizon, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::reduction::state::{first_new_row, Refresh, SeriesState};
use crate::models::reduction::{ModelKind, RegressorSlot, Strategy, DEFAULT_WINDOW_LENGTH};
use crate::models::Forecaster;
use crate::regression::Regressor;
use crate::transform::{last_window, sliding_windows};
use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

/// Recursive multi-step forecaster.
///
/// A single regressor learns to map the last `window_length` values to the
/// next one. To forecast `h` steps ahead the window is shifted forward `h`
/// times, each prediction becoming the newest value of the window.
///
/// # Example
///
/// ```
/// use anofox_reduction::core::{ForecastingHorizon, TimeSeries};
/// use anofox_reduction::models::Forecaster;
/// use anofox_reduction::models::reduction::RecursiveForecaster;
/// use anofox_reduction::regression::LinearRegression;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps = (0..30).map(|i| start + Duration::hours(i)).collect();
/// let values = (0..30).map(|i| 2.0 * i as f64 + 1.0).collect();
/// let series = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let mut model = RecursiveForecaster::new(LinearRegression::new()).with_window_length(3);
/// model.fit(&series, None).unwrap();
///
/// let forecast = model.predict(&ForecastingHorizon::from_steps(2).unwrap()).unwrap();
/// assert!((forecast.values()[0] - 61.0).abs() < 1e-6);
/// assert!((forecast.values()[1] - 63.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveForecaster<R> {
    slot: RegressorSlot<R>,
    window_length: usize,
    kind: ModelKind,
    fitted: Option<Fitted<R>>,
}

#[derive(Debug, Clone)]
struct Fitted<R> {
    regressor: R,
    state: SeriesState,
}

impl<R: Regressor> RecursiveForecaster<R> {
    /// Create a recursive forecaster around a template regressor.
    pub fn new(regressor: R) -> Self {
        Self::from_slot(RegressorSlot::single(regressor))
    }

    /// Create a recursive forecaster from a regressor slot.
    ///
    /// A per-step list must hold exactly one regressor.
    pub fn from_slot(slot: RegressorSlot<R>) -> Self {
        Self {
            slot,
            window_length: DEFAULT_WINDOW_LENGTH,
            kind: ModelKind::Regressor,
            fitted: None,
        }
    }

    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    pub(crate) fn with_model_kind(mut self, kind: ModelKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// The fitted regressor.
    pub fn regressor(&self) -> Option<&R> {
        self.fitted.as_ref().map(|f| &f.regressor)
    }

    fn fitted(&self) -> Result<&Fitted<R>> {
        self.fitted.as_ref().ok_or(ForecastError::FitRequired)
    }
}

/// Step-by-step roll-out of a single-step regressor.
///
/// Each item is the prediction for the next step; the window then drops its
/// oldest value and takes the prediction as its newest.
struct RecursiveSteps<'a, R> {
    regressor: &'a R,
    window: VecDeque<f64>,
}

impl<'a, R: Regressor> RecursiveSteps<'a, R> {
    fn new(regressor: &'a R, window: &[f64]) -> Self {
        Self {
            regressor,
            window: window.iter().copied().collect(),
        }
    }
}

impl<R: Regressor> Iterator for RecursiveSteps<'_, R> {
    type Item = Result<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let features = vec![self.window.iter().copied().collect::<Vec<f64>>()];
        let next = match self.regressor.predict(&features) {
            Ok(pred) => match pred.first() {
                Some(&value) => value,
                None => {
                    return Some(Err(ForecastError::ComputationError(
                        "regressor returned no prediction".to_string(),
                    )))
                }
            },
            Err(e) => return Some(Err(e)),
        };
        self.window.pop_front();
        self.window.push_back(next);
        Some(Ok(next))
    }
}

impl<R: Regressor> Forecaster for RecursiveForecaster<R> {
    fn fit(&mut self, series: &TimeSeries, horizon: Option<&ForecastingHorizon>) -> Result<()> {
        let mut regressor = self
            .slot
            .instantiate(1)?
            .pop()
            .ok_or_else(|| ForecastError::ComputationError("empty regressor slot".to_string()))?;
        let state = SeriesState::new(series)?;
        if let Some(horizon) = horizon {
            state.resolve(horizon)?;
        }

        let table = sliding_windows(state.values(), self.window_length)?;
        regressor.fit(table.features(), &table.target_column(0))?;

        debug!(
            strategy = %Strategy::Recursive,
            window_length = self.window_length,
            rows = table.len(),
            regressor = regressor.name(),
            "fitted reduction forecaster"
        );

        self.fitted = Some(Fitted { regressor, state });
        Ok(())
    }

    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Forecast> {
        let fitted = self.fitted()?;
        let offsets = fitted.state.resolve(horizon)?;
        let max_offset = offsets.iter().copied().max().unwrap_or(0);

        let window = last_window(fitted.state.values(), self.window_length)?;
        let path = RecursiveSteps::new(&fitted.regressor, window)
            .take(max_offset)
            .collect::<Result<Vec<f64>>>()?;
        trace!(steps = path.len(), "rolled out recursive path");

        let values = offsets.iter().map(|&o| path[o - 1]).collect();
        fitted.state.forecast(offsets, values)
    }

    fn update(&mut self, series: &TimeSeries, update_params: bool) -> Result<()> {
        let window_length = self.window_length;
        let fitted = self.fitted.as_mut().ok_or(ForecastError::FitRequired)?;

        let previous_len = match fitted.state.refresh(series)? {
            Refresh::Appended {
                previous_len,
                added,
            } if added > 0 => previous_len,
            _ => return Ok(()),
        };
        if !update_params {
            return Ok(());
        }
        if !fitted.regressor.supports_update() {
            warn!(
                regressor = fitted.regressor.name(),
                "regressor cannot be updated, keeping fitted parameters"
            );
            return Ok(());
        }

        let table = sliding_windows(fitted.state.values(), window_length)?
            .skip(first_new_row(previous_len, window_length, 1));
        if !table.is_empty() {
            fitted
                .regressor
                .update(table.features(), &table.target_column(0))?;
            debug!(rows = table.len(), "updated recursive regressor");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        Strategy::Recursive.forecaster_name(self.kind)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.fitted.as_ref().map(|f| f.state.cutoff())
    }
}
