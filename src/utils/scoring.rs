//! Named scorers wrapping the loss functions.
//!
//! A [`Scorer`] gives model selection code one shape for every metric: a
//! display name, an orientation and a `(y_true, y_pred) -> score` call.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::utils::metrics;

type ScoreFn = dyn Fn(&[f64], &[f64]) -> Result<f64> + Send + Sync;

/// A loss or score function bound to a name and an orientation.
///
/// # Example
///
/// ```
/// use anofox_reduction::utils::scoring::Scorer;
///
/// let scorer = Scorer::smape();
/// assert_eq!(scorer.name(), "sMAPE");
/// assert!(!scorer.greater_is_better());
/// assert_eq!(scorer.score(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
/// ```
#[derive(Clone)]
pub struct Scorer {
    name: String,
    greater_is_better: bool,
    func: Arc<ScoreFn>,
}

impl fmt::Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer")
            .field("name", &self.name)
            .field("greater_is_better", &self.greater_is_better)
            .finish()
    }
}

impl Scorer {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a higher score means a better forecast.
    pub fn greater_is_better(&self) -> bool {
        self.greater_is_better
    }

    pub fn score(&self, y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
        (self.func)(y_true, y_pred)
    }

    /// Mean absolute scaled error against the seasonal naive forecast of
    /// `y_train` with period `sp`.
    pub fn mase(y_train: Vec<f64>, sp: usize) -> Self {
        make_forecasting_scorer(
            move |a: &[f64], p: &[f64]| metrics::mase(a, p, &y_train, sp),
            "MASE",
            false,
        )
    }

    /// Root mean squared scaled error, see [`Scorer::mase`].
    pub fn rmsse(y_train: Vec<f64>, sp: usize) -> Self {
        make_forecasting_scorer(
            move |a: &[f64], p: &[f64]| metrics::rmsse(a, p, &y_train, sp),
            "RMSSE",
            false,
        )
    }

    pub fn smape() -> Self {
        make_forecasting_scorer(metrics::smape, "sMAPE", false)
    }

    pub fn mape() -> Self {
        make_forecasting_scorer(metrics::mape, "MAPE", false)
    }

    pub fn mad() -> Self {
        make_forecasting_scorer(metrics::mad, "MAD", false)
    }

    pub fn gmae() -> Self {
        make_forecasting_scorer(metrics::gmae, "GMAE", false)
    }

    pub fn rmspe() -> Self {
        make_forecasting_scorer(metrics::rmspe, "RMSPE", false)
    }
}

/// Wrap an arbitrary metric function as a [`Scorer`].
pub fn make_forecasting_scorer<F>(
    func: F,
    name: impl Into<String>,
    greater_is_better: bool,
) -> Scorer
where
    F: Fn(&[f64], &[f64]) -> Result<f64> + Send + Sync + 'static,
{
    Scorer {
        name: name.into(),
        greater_is_better,
        func: Arc::new(func),
    }
}
