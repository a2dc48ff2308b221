//! Forecasting models.

mod traits;

pub mod ensemble;
pub mod reduction;

pub use traits::{BoxedForecaster, Forecaster};
