//! Sampling frequency of a series: a fixed duration or a number of calendar months.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Days, Duration, Months, Utc};

/// Spacing between consecutive observations.
///
/// Calendar months have uneven lengths, so monthly, quarterly and yearly
/// data are stepped with month arithmetic instead of a fixed duration.
/// Anchors on the last day of a month stay on month ends.
///
/// # Example
///
/// ```
/// use anofox_reduction::core::Frequency;
/// use chrono::{TimeZone, Utc};
///
/// let jan = Utc.with_ymd_and_hms(1949, 1, 1, 0, 0, 0).unwrap();
/// let mar = Utc.with_ymd_and_hms(1949, 3, 1, 0, 0, 0).unwrap();
///
/// let monthly = Frequency::months(1);
/// assert_eq!(monthly.advance(jan, 2), Some(mar));
/// assert_eq!(monthly.steps_between(jan, mar), Some(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Fixed elapsed time between observations.
    Fixed(Duration),
    /// Whole calendar months between observations (1 monthly, 3 quarterly, 12 yearly).
    Months(u32),
}

impl Frequency {
    pub fn months(months: u32) -> Self {
        Frequency::Months(months)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Frequency::Fixed(d) if *d <= Duration::zero() => Err(ForecastError::InvalidParameter(
                "frequency must be a positive duration".to_string(),
            )),
            Frequency::Months(0) => Err(ForecastError::InvalidParameter(
                "frequency must span at least one month".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Timestamp `steps` periods after `anchor`, or `None` when it leaves the representable range.
    pub fn advance(&self, anchor: DateTime<Utc>, steps: usize) -> Option<DateTime<Utc>> {
        let steps = u32::try_from(steps).ok()?;
        match self {
            Frequency::Fixed(period) => {
                let delta = period.checked_mul(i32::try_from(steps).ok()?)?;
                anchor.checked_add_signed(delta)
            }
            Frequency::Months(months) => add_months(anchor, months.checked_mul(steps)?),
        }
    }

    /// Whole number of periods from `from` to `to`; `None` when `to` is not on the grid.
    ///
    /// The result is negative or zero for timestamps at or before `from`.
    pub fn steps_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Option<i64> {
        match self {
            Frequency::Fixed(period) => {
                let period = period.num_milliseconds();
                let delta = (to - from).num_milliseconds();
                if period <= 0 || delta % period != 0 {
                    return None;
                }
                Some(delta / period)
            }
            Frequency::Months(months) => {
                let months = i64::from(*months);
                let elapsed = month_index(to) - month_index(from);
                if months == 0 || elapsed % months != 0 {
                    return None;
                }
                let steps = elapsed / months;
                // compare on the grid in the forward direction
                let (early, late) = if steps >= 0 { (from, to) } else { (to, from) };
                let shifted = add_months(early, u32::try_from(elapsed.abs()).ok()?)?;
                (shifted == late).then_some(steps)
            }
        }
    }

    /// Calendar month count when `later` lies whole months after `earlier`.
    pub(crate) fn month_step(earlier: DateTime<Utc>, later: DateTime<Utc>) -> Option<u32> {
        let elapsed = u32::try_from(month_index(later) - month_index(earlier)).ok()?;
        if elapsed == 0 {
            return None;
        }
        (add_months(earlier, elapsed)? == later).then_some(elapsed)
    }
}

impl From<Duration> for Frequency {
    fn from(period: Duration) -> Self {
        Frequency::Fixed(period)
    }
}

fn month_index(t: DateTime<Utc>) -> i64 {
    i64::from(t.year()) * 12 + i64::from(t.month0())
}

fn is_month_end(t: DateTime<Utc>) -> bool {
    t.checked_add_days(Days::new(1))
        .map_or(false, |next| next.month() != t.month())
}

fn add_months(t: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    if is_month_end(t) {
        t.with_day(1)?
            .checked_add_months(Months::new(months.checked_add(1)?))?
            .checked_sub_days(Days::new(1))
    } else {
        t.checked_add_months(Months::new(months))
    }
}
