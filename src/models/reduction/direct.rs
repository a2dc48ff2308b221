//! Direct reduction: one regressor per horizon step.

use crate::core::{Forecast, ForecastingHorizon, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::reduction::state::{
    bind_offsets, first_new_row, require_fit_horizon, Refresh, SeriesState,
};
use crate::models::reduction::{ModelKind, RegressorSlot, Strategy, DEFAULT_WINDOW_LENGTH};
use crate::models::Forecaster;
use crate::regression::Regressor;
use crate::transform::{last_window, sliding_windows_multi};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Direct multi-step forecaster.
///
/// For every step `h` of the horizon given to `fit`, a separate regressor
/// learns to map a window to the value `h` steps after it. All regressors
/// predict from the same last observed window, so predictions never feed
/// back into the features.
#[derive(Debug, Clone)]
pub struct DirectForecaster<R> {
    slot: RegressorSlot<R>,
    window_length: usize,
    kind: ModelKind,
    fitted: Option<Fitted<R>>,
}

#[derive(Debug, Clone)]
struct Fitted<R> {
    /// regressors[j] predicts offsets[j]
    regressors: Vec<R>,
    offsets: Vec<usize>,
    state: SeriesState,
}

impl<R: Regressor> DirectForecaster<R> {
    /// Clone `regressor` once per horizon step.
    pub fn new(regressor: R) -> Self {
        Self::from_slot(RegressorSlot::single(regressor))
    }

    /// Use one given regressor per horizon step, in horizon order.
    pub fn per_step(regressors: Vec<R>) -> Self {
        Self::from_slot(RegressorSlot::per_step(regressors))
    }

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

    /// Fitted regressors, one per fitted horizon step.
    pub fn regressors(&self) -> Option<&[R]> {
        self.fitted.as_ref().map(|f| f.regressors.as_slice())
    }

    /// Horizon offsets bound at fit.
    pub fn fitted_offsets(&self) -> Option<&[usize]> {
        self.fitted.as_ref().map(|f| f.offsets.as_slice())
    }
}

impl<R: Regressor> Forecaster for DirectForecaster<R> {
    fn fit(&mut self, series: &TimeSeries, horizon: Option<&ForecastingHorizon>) -> Result<()> {
        let horizon = require_fit_horizon(Strategy::Direct, horizon)?;
        let state = SeriesState::new(series)?;
        let offsets = state.resolve(horizon)?;
        let mut regressors = self.slot.instantiate(offsets.len())?;

        let table = sliding_windows_multi(state.values(), self.window_length, &offsets)?;
        for (column, regressor) in regressors.iter_mut().enumerate() {
            regressor.fit(table.features(), &table.target_column(column))?;
        }

        debug!(
            strategy = %Strategy::Direct,
            window_length = self.window_length,
            horizon = offsets.len(),
            rows = table.len(),
            regressors = regressors.len(),
            "fitted reduction forecaster"
        );

        self.fitted = Some(Fitted {
            regressors,
            offsets,
            state,
        });
        Ok(())
    }

    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;
        let requested = fitted.state.resolve(horizon)?;
        let columns = bind_offsets(&fitted.offsets, &requested)?;

        let window = vec![last_window(fitted.state.values(), self.window_length)?.to_vec()];
        let values = columns
            .iter()
            .map(|&j| {
                fitted.regressors[j].predict(&window)?.first().copied().ok_or_else(|| {
                    ForecastError::ComputationError("regressor returned no prediction".to_string())
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        fitted.state.forecast(requested, values)
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
        if !fitted.regressors.iter().all(|r| r.supports_update()) {
            warn!(
                strategy = %Strategy::Direct,
                "regressors cannot be updated, keeping fitted parameters"
            );
            return Ok(());
        }

        let max_offset = fitted.offsets.iter().copied().max().unwrap_or(1);
        let values = fitted.state.values();
        if values.len() < window_length + max_offset {
            return Ok(());
        }
        let table = sliding_windows_multi(values, window_length, &fitted.offsets)?
            .skip(first_new_row(previous_len, window_length, max_offset));
        if table.is_empty() {
            return Ok(());
        }
        for (column, regressor) in fitted.regressors.iter_mut().enumerate() {
            regressor.update(table.features(), &table.target_column(column))?;
        }
        debug!(rows = table.len(), "updated direct regressors");
        Ok(())
    }

    fn name(&self) -> &str {
        Strategy::Direct.forecaster_name(self.kind)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.fitted.as_ref().map(|f| f.state.cutoff())
    }
}
