//! Multi-output reduction: a single regressor predicts the whole horizon.

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

/// Multi-output forecaster.
///
/// One regressor is fitted on the target matrix of every horizon step at
/// once and predicts them jointly from the last window. The regressor must
/// support multi-output regression.
#[derive(Debug, Clone)]
pub struct MultioutputForecaster<R> {
    slot: RegressorSlot<R>,
    window_length: usize,
    kind: ModelKind,
    fitted: Option<Fitted<R>>,
}

#[derive(Debug, Clone)]
struct Fitted<R> {
    regressor: R,
    offsets: Vec<usize>,
    state: SeriesState,
}

impl<R: Regressor> MultioutputForecaster<R> {
    pub fn new(regressor: R) -> Self {
        Self::from_slot(RegressorSlot::single(regressor))
    }

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

    pub fn regressor(&self) -> Option<&R> {
        self.fitted.as_ref().map(|f| &f.regressor)
    }
}

impl<R: Regressor> Forecaster for MultioutputForecaster<R> {
    fn fit(&mut self, series: &TimeSeries, horizon: Option<&ForecastingHorizon>) -> Result<()> {
        let horizon = require_fit_horizon(Strategy::MultiOutput, horizon)?;
        let mut regressor = self
            .slot
            .instantiate(1)?
            .pop()
            .ok_or_else(|| ForecastError::ComputationError("empty regressor slot".to_string()))?;
        if !regressor.supports_multioutput() {
            return Err(ForecastError::Unsupported(format!(
                "{} cannot predict several outputs at once",
                regressor.name()
            )));
        }
        let state = SeriesState::new(series)?;
        let offsets = state.resolve(horizon)?;

        let table = sliding_windows_multi(state.values(), self.window_length, &offsets)?;
        regressor.fit_multi(table.features(), table.target_rows())?;

        debug!(
            strategy = %Strategy::MultiOutput,
            window_length = self.window_length,
            horizon = offsets.len(),
            rows = table.len(),
            regressor = regressor.name(),
            "fitted reduction forecaster"
        );

        self.fitted = Some(Fitted {
            regressor,
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
        let joint = fitted
            .regressor
            .predict_multi(&window)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ForecastError::ComputationError("regressor returned no prediction".to_string())
            })?;
        if joint.len() != fitted.offsets.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: fitted.offsets.len(),
                got: joint.len(),
            });
        }

        let values = columns.iter().map(|&j| joint[j]).collect();
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
        if !fitted.regressor.supports_update() {
            warn!(
                regressor = fitted.regressor.name(),
                "regressor cannot be updated, keeping fitted parameters"
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
        if !table.is_empty() {
            fitted
                .regressor
                .update_multi(table.features(), table.target_rows())?;
            debug!(rows = table.len(), "updated multioutput regressor");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        Strategy::MultiOutput.forecaster_name(self.kind)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.fitted.as_ref().map(|f| f.state.cutoff())
    }
}
