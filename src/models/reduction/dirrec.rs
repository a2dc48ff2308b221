//! DirRec reduction: per-step regressors whose features grow with the
//! earlier steps.

use crate::core::{Forecast, ForecastingHorizon, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::reduction::state::{
    bind_offsets, first_new_row, require_fit_horizon, Refresh, SeriesState,
};
use crate::models::reduction::{ModelKind, RegressorSlot, Strategy, DEFAULT_WINDOW_LENGTH};
use crate::models::Forecaster;
use crate::regression::Regressor;
use crate::transform::{last_window, sliding_windows_multi, TrainingTable};
use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

/// Hybrid of the direct and recursive strategies.
///
/// Horizon steps are handled in increasing order. The regressor of a step is
/// trained on the window extended by the true values at every earlier fitted
/// step, and at prediction time it receives the window extended by the
/// predictions made for those steps.
#[derive(Debug, Clone)]
pub struct DirRecForecaster<R> {
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
    /// positions into `offsets`, by increasing offset
    order: Vec<usize>,
    state: SeriesState,
}

impl<R: Regressor> DirRecForecaster<R> {
    pub fn new(regressor: R) -> Self {
        Self::from_slot(RegressorSlot::single(regressor))
    }

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

    pub fn regressors(&self) -> Option<&[R]> {
        self.fitted.as_ref().map(|f| f.regressors.as_slice())
    }
}

fn ascending_order(offsets: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..offsets.len()).collect();
    order.sort_by_key(|&j| offsets[j]);
    order
}

/// Features of the `rank`-th step: each window followed by the targets of
/// the steps ranked before it.
fn augmented_features(table: &TrainingTable, order: &[usize], rank: usize) -> Vec<Vec<f64>> {
    table
        .features()
        .iter()
        .zip(table.target_rows())
        .map(|(window, targets)| {
            let mut row = window.clone();
            row.extend(order[..rank].iter().map(|&j| targets[j]));
            row
        })
        .collect()
}

impl<R: Regressor> Forecaster for DirRecForecaster<R> {
    fn fit(&mut self, series: &TimeSeries, horizon: Option<&ForecastingHorizon>) -> Result<()> {
        let horizon = require_fit_horizon(Strategy::DirRec, horizon)?;
        let state = SeriesState::new(series)?;
        let offsets = state.resolve(horizon)?;
        let mut regressors = self.slot.instantiate(offsets.len())?;

        let table = sliding_windows_multi(state.values(), self.window_length, &offsets)?;
        let order = ascending_order(&offsets);
        for (rank, &j) in order.iter().enumerate() {
            let features = augmented_features(&table, &order, rank);
            regressors[j].fit(&features, &table.target_column(j))?;
        }

        debug!(
            strategy = %Strategy::DirRec,
            window_length = self.window_length,
            horizon = offsets.len(),
            rows = table.len(),
            regressors = regressors.len(),
            "fitted reduction forecaster"
        );

        self.fitted = Some(Fitted {
            regressors,
            offsets,
            order,
            state,
        });
        Ok(())
    }

    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Forecast> {
        let fitted = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;
        let requested = fitted.state.resolve(horizon)?;
        let columns = bind_offsets(&fitted.offsets, &requested)?;
        let last_needed = requested.iter().copied().max().unwrap_or(0);

        let mut row = last_window(fitted.state.values(), self.window_length)?.to_vec();
        let mut predictions = vec![f64::NAN; fitted.offsets.len()];
        for &j in &fitted.order {
            if fitted.offsets[j] > last_needed {
                break;
            }
            let value = fitted.regressors[j]
                .predict(std::slice::from_ref(&row))?
                .first()
                .copied()
                .ok_or_else(|| {
                    ForecastError::ComputationError("regressor returned no prediction".to_string())
                })?;
            trace!(step = fitted.offsets[j], value, "dirrec step");
            predictions[j] = value;
            row.push(value);
        }

        let values = columns.iter().map(|&j| predictions[j]).collect();
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
                strategy = %Strategy::DirRec,
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
        for (rank, &j) in fitted.order.iter().enumerate() {
            let features = augmented_features(&table, &fitted.order, rank);
            fitted.regressors[j].update(&features, &table.target_column(j))?;
        }
        debug!(rows = table.len(), "updated dirrec regressors");
        Ok(())
    }

    fn name(&self) -> &str {
        Strategy::DirRec.forecaster_name(self.kind)
    }

    fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.fitted.as_ref().map(|f| f.state.cutoff())
    }
}
