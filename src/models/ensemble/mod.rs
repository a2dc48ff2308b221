//! Ensemble forecasting methods.
//!
//! Combines multiple forecasting models into a single forecast.

mod model;

pub use model::{Aggregation, Ensemble};
