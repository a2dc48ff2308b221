//! Configuration of reduction forecasters.

use crate::error::{ForecastError, Result};
use std::fmt;
use std::str::FromStr;

/// Default number of past values in a feature window.
pub const DEFAULT_WINDOW_LENGTH: usize = 10;

/// Multi-step strategy of a reduction forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// One single-step regressor fed with its own predictions.
    #[default]
    Recursive,
    /// One regressor per horizon step, all fed with the last observed window.
    Direct,
    /// One regressor per horizon step, each fed with the window and the
    /// predictions of the earlier steps.
    DirRec,
    /// One regressor predicting every horizon step jointly.
    MultiOutput,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Recursive,
        Strategy::Direct,
        Strategy::DirRec,
        Strategy::MultiOutput,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Recursive => "recursive",
            Strategy::Direct => "direct",
            Strategy::DirRec => "dirrec",
            Strategy::MultiOutput => "multioutput",
        }
    }

    /// Whether the strategy binds one regressor per step at fit time.
    pub fn requires_fit_horizon(&self) -> bool {
        !matches!(self, Strategy::Recursive)
    }

    /// Display name of the forecaster reducing with this strategy.
    pub fn forecaster_name(&self, kind: ModelKind) -> &'static str {
        match (self, kind) {
            (Strategy::Recursive, ModelKind::Regressor) => "RecursiveRegressionForecaster",
            (Strategy::Direct, ModelKind::Regressor) => "DirectRegressionForecaster",
            (Strategy::DirRec, ModelKind::Regressor) => "DirRecRegressionForecaster",
            (Strategy::MultiOutput, ModelKind::Regressor) => "MultioutputRegressionForecaster",
            (Strategy::Recursive, ModelKind::SeriesRegressor) => {
                "RecursiveTimeSeriesRegressionForecaster"
            }
            (Strategy::Direct, ModelKind::SeriesRegressor) => {
                "DirectTimeSeriesRegressionForecaster"
            }
            (Strategy::DirRec, ModelKind::SeriesRegressor) => {
                "DirRecTimeSeriesRegressionForecaster"
            }
            (Strategy::MultiOutput, ModelKind::SeriesRegressor) => {
                "MultioutputTimeSeriesRegressionForecaster"
            }
        }
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ForecastError::UnknownStrategy {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Kind of model the reduction is performed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelKind {
    /// Tabular regressor over feature rows.
    #[default]
    Regressor,
    /// Time-series regressor over panels of sub-series windows.
    SeriesRegressor,
}

/// Hyperparameters shared by all reduction strategies.
///
/// # Example
///
/// ```
/// use anofox_reduction::models::reduction::{ReductionConfig, Strategy};
///
/// let config = ReductionConfig::default()
///     .with_strategy(Strategy::DirRec)
///     .with_window_length(12);
/// assert_eq!(config.window_length, 12);
///
/// let parsed = ReductionConfig::parse("multioutput", 6).unwrap();
/// assert_eq!(parsed.strategy, Strategy::MultiOutput);
/// assert!(ReductionConfig::parse("stacked", 6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReductionConfig {
    /// Number of past values per feature window.
    pub window_length: usize,
    /// Multi-step strategy.
    pub strategy: Strategy,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            strategy: Strategy::Recursive,
        }
    }
}

impl ReductionConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Build a configuration from a strategy name.
    pub fn parse(strategy: &str, window_length: usize) -> Result<Self> {
        Ok(Self {
            window_length,
            strategy: strategy.parse()?,
        })
    }

    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}
