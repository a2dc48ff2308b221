//! Property-based tests for the windower and the reduction forecasters.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated time series data.

use anofox_reduction::core::{ForecastingHorizon, TimeSeries};
use anofox_reduction::models::ensemble::Aggregation;
use anofox_reduction::models::reduction::{
    DirectForecaster, MultioutputForecaster, RecursiveForecaster,
};
use anofox_reduction::models::Forecaster;
use anofox_reduction::regression::LinearRegression;
use anofox_reduction::transform::{sliding_windows, sliding_windows_multi};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

/// Create a TimeSeries from a vector of values.
fn make_ts(values: &[f64]) -> TimeSeries {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let timestamps: Vec<_> = (0..values.len())
        .map(|i| base + Duration::hours(i as i64))
        .collect();
    TimeSeries::univariate(timestamps, values.to_vec()).unwrap()
}

/// Strategy for generating valid time series values.
/// Adds small variation to avoid all-constant series.
fn valid_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(1.0..1000.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.001;
            }
            v
        })
    })
}

// =============================================================================
// Property: the windower reproduces the series
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn windower_row_count_and_alignment(
        values in valid_values_strategy(2, 80),
        window in 1usize..20
    ) {
        prop_assume!(values.len() > window);
        let table = sliding_windows(&values, window).unwrap();

        prop_assert_eq!(table.len(), values.len() - window);
        let rows = table.features().iter().zip(table.target_rows());
        for (i, (features, target)) in rows.enumerate() {
            prop_assert_eq!(features.as_slice(), &values[i..i + window]);
            prop_assert_eq!(target[0], values[i + window]);
        }

        // first window followed by every target rebuilds the series
        let mut rebuilt = table.features()[0].clone();
        rebuilt.extend(table.target_column(0));
        prop_assert_eq!(rebuilt, values);
    }

    #[test]
    fn windower_rejects_short_series(
        values in valid_values_strategy(1, 20),
        extra in 0usize..5
    ) {
        let window = values.len() + extra;
        prop_assert!(sliding_windows(&values, window).is_err());
    }

    #[test]
    fn multi_target_rows_share_the_common_range(
        values in valid_values_strategy(10, 80),
        window in 1usize..8,
        horizon in 1usize..8
    ) {
        prop_assume!(values.len() >= window + horizon);
        let offsets: Vec<usize> = (1..=horizon).collect();
        let table = sliding_windows_multi(&values, window, &offsets).unwrap();

        prop_assert_eq!(table.len(), values.len() - window - horizon + 1);
        for (i, targets) in table.target_rows().iter().enumerate() {
            prop_assert_eq!(targets.as_slice(), &values[i + window..i + window + horizon]);
        }
    }
}

// =============================================================================
// Property: Forecast length matches requested horizon
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn recursive_forecast_length_matches_horizon(
        values in valid_values_strategy(30, 100),
        horizon in 1usize..20
    ) {
        let ts = make_ts(&values);
        let mut model = RecursiveForecaster::new(LinearRegression::new()).with_window_length(5);
        model.fit(&ts, None).unwrap();
        let fh = ForecastingHorizon::from_steps(horizon).unwrap();
        let forecast = model.predict(&fh).unwrap();
        prop_assert_eq!(forecast.horizon(), horizon);
        prop_assert!(forecast.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn direct_forecast_length_matches_horizon(
        values in valid_values_strategy(30, 100),
        horizon in 1usize..10
    ) {
        let ts = make_ts(&values);
        let fh = ForecastingHorizon::from_steps(horizon).unwrap();
        let mut model = DirectForecaster::new(LinearRegression::new()).with_window_length(5);
        model.fit(&ts, Some(&fh)).unwrap();
        let forecast = model.predict(&fh).unwrap();
        prop_assert_eq!(forecast.horizon(), horizon);
        prop_assert_eq!(forecast.offsets().to_vec(), (1..=horizon).collect::<Vec<_>>());
    }

    #[test]
    fn multioutput_matches_direct(
        values in valid_values_strategy(30, 100),
        horizon in 1usize..8
    ) {
        let ts = make_ts(&values);
        let fh = ForecastingHorizon::from_steps(horizon).unwrap();

        let mut direct = DirectForecaster::new(LinearRegression::new()).with_window_length(4);
        direct.fit(&ts, Some(&fh)).unwrap();
        let mut multi = MultioutputForecaster::new(LinearRegression::new()).with_window_length(4);
        multi.fit(&ts, Some(&fh)).unwrap();

        let a = direct.predict(&fh).unwrap();
        let b = multi.predict(&fh).unwrap();
        for (x, y) in a.values().iter().zip(b.values()) {
            prop_assert!((x - y).abs() <= 1e-5 * (1.0 + x.abs()));
        }
    }

    #[test]
    fn recursive_output_follows_requested_order(
        values in valid_values_strategy(30, 60),
        offsets in prop::sample::subsequence((1i64..=12).collect::<Vec<_>>(), 1..12)
    ) {
        let mut offsets = offsets;
        let ts = make_ts(&values);
        let mut model = RecursiveForecaster::new(LinearRegression::new()).with_window_length(4);
        model.fit(&ts, None).unwrap();
        let full = model.predict(&ForecastingHorizon::from_steps(12).unwrap()).unwrap();

        offsets.reverse();
        let sparse = model
            .predict(&ForecastingHorizon::relative(offsets.clone()).unwrap())
            .unwrap();
        for (value, offset) in sparse.values().iter().zip(&offsets) {
            prop_assert_eq!(*value, full.values()[*offset as usize - 1]);
        }
    }
}

// =============================================================================
// Property: ensemble aggregations are ordered
// =============================================================================

proptest! {
    #[test]
    fn aggregations_lie_between_min_and_max(
        values in prop::collection::vec(-1000.0..1000.0_f64, 1..12)
    ) {
        let min = Aggregation::Min.aggregate(&values);
        let max = Aggregation::Max.aggregate(&values);
        for aggregation in [Aggregation::Mean, Aggregation::Median] {
            let v = aggregation.aggregate(&values);
            prop_assert!(v >= min - 1e-9 && v <= max + 1e-9);
        }
    }
}
