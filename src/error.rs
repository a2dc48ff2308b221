//! Error types for the anofox-reduction library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during reduction forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Malformed forecasting horizon.
    #[error("invalid forecasting horizon: {0}")]
    InvalidHorizon(String),

    /// A per-step regressor list does not match the horizon length.
    #[error("expected {expected} regressors (one per horizon step), got {got}")]
    RegressorCountMismatch { expected: usize, got: usize },

    /// Strategy name not recognised.
    #[error("unknown strategy '{name}', valid values are {valid}")]
    UnknownStrategy { name: String, valid: String },

    /// Aggregation name not recognised.
    #[error("invalid aggregation '{name}', valid values are {valid}")]
    UnknownAggregation { name: String, valid: String },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Operation is not supported by this model.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}

impl ForecastError {
    /// Whether the error stems from malformed configuration rather than data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ForecastError::InvalidParameter(_)
                | ForecastError::InvalidHorizon(_)
                | ForecastError::RegressorCountMismatch { .. }
                | ForecastError::UnknownStrategy { .. }
                | ForecastError::UnknownAggregation { .. }
        )
    }
}
