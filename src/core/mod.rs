//! Core data structures for time series forecasting.

mod forecast;
mod frequency;
mod horizon;
mod time_series;

pub use forecast::Forecast;
pub use frequency::Frequency;
pub use horizon::{check_regressor_count, validate_offsets, ForecastingHorizon, HorizonKind};
pub use time_series::{TimeSeries, TimeSeriesBuilder};
