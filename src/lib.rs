//! # anofox-reduction
//!
//! Time series forecasting by reduction to supervised regression.
//!
//! A series is cut into sliding windows and any tabular (or time-series)
//! regressor is trained to map a window to the values that follow it.
//! Recursive, direct, dirrec and multi-output strategies turn that into
//! multi-step forecasts; an ensemble combines several forecasters, and
//! scorers wrap the usual point forecast losses.

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod regression;
pub mod transform;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, ForecastingHorizon, Frequency, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::ensemble::{Aggregation, Ensemble};
    pub use crate::models::reduction::{
        DirRecForecaster, DirectForecaster, ModelKind, MultioutputForecaster, RecursiveForecaster,
        ReductionConfig, ReductionForecaster, RegressorSlot, Strategy,
    };
    pub use crate::models::{BoxedForecaster, Forecaster};
    pub use crate::regression::{LinearRegression, Regressor, SeriesRegressor, Tabularizer};
    pub use crate::utils::{make_forecasting_scorer, temporal_train_test_split, Scorer};
}
