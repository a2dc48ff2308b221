//! Reduction of forecasting to supervised regression.
//!
//! A series is cut into sliding windows of `window_length` past values; a
//! regressor learns to map a window to the value(s) that follow it. The
//! strategies differ in how they turn that into multi-step forecasts:
//!
//! - [`RecursiveForecaster`]: one single-step model fed its own predictions
//! - [`DirectForecaster`]: one model per horizon step
//! - [`DirRecForecaster`]: one model per step, each fed the earlier steps
//! - [`MultioutputForecaster`]: one model predicting every step jointly
//!
//! [`ReductionForecaster`] selects a strategy from a [`ReductionConfig`].

mod config;
mod direct;
mod dirrec;
mod forecaster;
mod multioutput;
mod recursive;
mod slot;
mod state;

pub use config::{ModelKind, ReductionConfig, Strategy, DEFAULT_WINDOW_LENGTH};
pub use direct::DirectForecaster;
pub use dirrec::DirRecForecaster;
pub use forecaster::ReductionForecaster;
pub use multioutput::MultioutputForecaster;
pub use recursive::RecursiveForecaster;
pub use slot::RegressorSlot;
