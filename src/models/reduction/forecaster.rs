//! Strategy-dispatching reduction forecaster.

use crate::core::{Forecast, ForecastingHorizon, TimeSeries};
use crate::error::Result;
use crate::models::reduction::{
    DirRecForecaster, DirectForecaster, ModelKind, MultioutputForecaster, RecursiveForecaster,
    ReductionConfig, RegressorSlot, Strategy,
};
use crate::models::Forecaster;
use crate::regression::{Regressor, SeriesRegressor, WindowedRegressor};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
enum Inner<R> {
    Recursive(RecursiveForecaster<R>),
    Direct(DirectForecaster<R>),
    DirRec(DirRecForecaster<R>),
    MultiOutput(MultioutputForecaster<R>),
}

/// Reduction forecaster selected by strategy and model kind.
///
/// Behaves exactly like the strategy-specific forecaster it wraps, built
/// with the same regressors and window length.
///
/// # Example
///
/// ```
/// use anofox_reduction::core::{ForecastingHorizon, TimeSeries};
/// use anofox_reduction::models::Forecaster;
/// use anofox_reduction::models::reduction::{ReductionConfig, ReductionForecaster, RegressorSlot};
/// use anofox_reduction::regression::LinearRegression;
/// use chrono::{Duration, TimeZone, Utc};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps = (0..40).map(|i| start + Duration::days(i)).collect();
/// let values = (0..40).map(|i| (i % 7) as f64).collect();
/// let series = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let config = ReductionConfig::parse("dirrec", 7).unwrap();
/// let mut model = ReductionForecaster::new(RegressorSlot::single(LinearRegression::new()), config);
/// let fh = ForecastingHorizon::from_steps(3).unwrap();
/// model.fit(&series, Some(&fh)).unwrap();
/// assert_eq!(model.predict(&fh).unwrap().horizon(), 3);
/// assert_eq!(model.name(), "DirRecRegressionForecaster");
/// ```
#[derive(Debug, Clone)]
pub struct ReductionForecaster<R> {
    config: ReductionConfig,
    kind: ModelKind,
    inner: Inner<R>,
}

impl<R: Regressor> ReductionForecaster<R> {
    /// Reduce to tabular regression with the configured strategy.
    pub fn new(regressors: RegressorSlot<R>, config: ReductionConfig) -> Self {
        Self::build(regressors, config, ModelKind::Regressor)
    }

    /// Like [`ReductionForecaster::new`], naming the strategy as a string.
    pub fn from_strategy_name(
        regressors: RegressorSlot<R>,
        strategy: &str,
        window_length: usize,
    ) -> Result<Self> {
        Ok(Self::new(
            regressors,
            ReductionConfig::parse(strategy, window_length)?,
        ))
    }

    fn build(regressors: RegressorSlot<R>, config: ReductionConfig, kind: ModelKind) -> Self {
        let w = config.window_length;
        let inner = match config.strategy {
            Strategy::Recursive => Inner::Recursive(
                RecursiveForecaster::from_slot(regressors)
                    .with_window_length(w)
                    .with_model_kind(kind),
            ),
            Strategy::Direct => Inner::Direct(
                DirectForecaster::from_slot(regressors)
                    .with_window_length(w)
                    .with_model_kind(kind),
            ),
            Strategy::DirRec => Inner::DirRec(
                DirRecForecaster::from_slot(regressors)
                    .with_window_length(w)
                    .with_model_kind(kind),
            ),
            Strategy::MultiOutput => Inner::MultiOutput(
                MultioutputForecaster::from_slot(regressors)
                    .with_window_length(w)
                    .with_model_kind(kind),
            ),
        };
        Self {
            config,
            kind,
            inner,
        }
    }

    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn model_kind(&self) -> ModelKind {
        self.kind
    }

    fn forecaster(&self) -> &dyn Forecaster {
        match &self.inner {
            Inner::Recursive(f) => f,
            Inner::Direct(f) => f,
            Inner::DirRec(f) => f,
            Inner::MultiOutput(f) => f,
        }
    }

    fn forecaster_mut(&mut self) -> &mut dyn Forecaster {
        match &mut self.inner {
            Inner::Recursive(f) => f,
            Inner::Direct(f) => f,
            Inner::DirRec(f) => f,
            Inner::MultiOutput(f) => f,
        }
    }
}

impl<S: SeriesRegressor> ReductionForecaster<WindowedRegressor<S>> {
    /// Reduce to time-series regression: every window is handed to the
    /// series regressor as a one-channel sub-series.
    pub fn windowed(regressors: RegressorSlot<S>, config: ReductionConfig) -> Self {
        Self::build(
            regressors.map(WindowedRegressor::new),
            config,
            ModelKind::SeriesRegressor,
        )
    }
}

impl<R: Regressor> Forecaster for ReductionForecaster<R> {
    fn fit(&mut self, series: &TimeSeries, horizon: Option<&ForecastingHorizon>) -> Result<()> {
        self.forecaster_mut().fit(series, horizon)
    }

    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Forecast> {
        self.forecaster().predict(horizon)
    }

    fn predict_with_intervals(&self, horizon: &ForecastingHorizon, level: f64) -> Result<Forecast> {
        self.forecaster().predict_with_intervals(horizon, level)
    }

    fn update(&mut self, series: &TimeSeries, update_params: bool) -> Result<()> {
        self.forecaster_mut().update(series, update_params)
    }

    fn name(&self) -> &str {
        self.strategy().forecaster_name(self.kind)
    }

    fn is_fitted(&self) -> bool {
        self.forecaster().is_fitted()
    }

    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.forecaster().cutoff()
    }
}
