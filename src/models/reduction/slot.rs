//! Ownership of the regressors a reduction strategy trains.

use crate::core::check_regressor_count;
use crate::error::Result;

/// Either one template regressor, cloned for every step that needs one, or
/// an explicit list with exactly one regressor per horizon step.
///
/// The slot keeps its regressors untouched: strategies fit the copies
/// returned by [`RegressorSlot::instantiate`].
#[derive(Debug, Clone, PartialEq)]
pub enum RegressorSlot<R> {
    Single(R),
    PerStep(Vec<R>),
}

impl<R: Clone> RegressorSlot<R> {
    pub fn single(regressor: R) -> Self {
        RegressorSlot::Single(regressor)
    }

    pub fn per_step(regressors: Vec<R>) -> Self {
        RegressorSlot::PerStep(regressors)
    }

    /// Number of regressors held, `None` for a broadcast template.
    pub fn explicit_len(&self) -> Option<usize> {
        match self {
            RegressorSlot::Single(_) => None,
            RegressorSlot::PerStep(list) => Some(list.len()),
        }
    }

    /// Fresh, independent regressors for `steps` steps.
    ///
    /// A per-step list must hold exactly `steps` entries; it is never
    /// truncated or padded.
    pub fn instantiate(&self, steps: usize) -> Result<Vec<R>> {
        match self {
            RegressorSlot::Single(template) => Ok(vec![template.clone(); steps]),
            RegressorSlot::PerStep(list) => {
                check_regressor_count(steps, list.len())?;
                Ok(list.clone())
            }
        }
    }

    /// Wrap every regressor of the slot.
    pub fn map<T, F: FnMut(R) -> T>(self, mut f: F) -> RegressorSlot<T> {
        match self {
            RegressorSlot::Single(template) => RegressorSlot::Single(f(template)),
            RegressorSlot::PerStep(list) => {
                RegressorSlot::PerStep(list.into_iter().map(f).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    #[test]
    fn single_is_broadcast() {
        let slot = RegressorSlot::single(7);
        assert_eq!(slot.explicit_len(), None);
        assert_eq!(slot.instantiate(3).unwrap(), vec![7, 7, 7]);
    }

    #[test]
    fn per_step_must_match_exactly() {
        let slot = RegressorSlot::per_step(vec![1, 2, 3]);
        assert_eq!(slot.explicit_len(), Some(3));
        assert_eq!(slot.instantiate(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            slot.instantiate(2),
            Err(ForecastError::RegressorCountMismatch {
                expected: 2,
                got: 3
            })
        );
        assert_eq!(
            slot.instantiate(4),
            Err(ForecastError::RegressorCountMismatch {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn map_wraps_each_regressor() {
        let slot = RegressorSlot::per_step(vec![1, 2]).map(|r| r * 10);
        assert_eq!(slot, RegressorSlot::PerStep(vec![10, 20]));
    }
}
