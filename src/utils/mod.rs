//! Utility functions for forecasting models.

pub mod metrics;
pub mod ols;
pub mod scoring;
pub mod split;

pub use metrics::{gmae, mad, mape, mase, rmspe, rmsse, smape};
pub use ols::{ols_fit, ols_fit_multi, OLSResult};
pub use scoring::{make_forecasting_scorer, Scorer};
pub use split::temporal_train_test_split;
