//! Integration tests of the reduction strategies on the airline passengers
//! series (monthly totals 1949-1960, indexed by month start).

use anofox_reduction::core::{ForecastingHorizon, Frequency, TimeSeries};
use anofox_reduction::error::ForecastError;
use anofox_reduction::models::reduction::{
    DirRecForecaster, DirectForecaster, MultioutputForecaster, RecursiveForecaster,
    ReductionConfig, ReductionForecaster, RegressorSlot, Strategy,
};
use anofox_reduction::models::{BoxedForecaster, Forecaster};
use anofox_reduction::regression::{LinearRegression, Tabularizer};
use anofox_reduction::utils::{smape, temporal_train_test_split};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

const TEST_SIZE: usize = 24;
const WINDOW_LENGTH: usize = 10;

#[rustfmt::skip]
const AIRLINE: [f64; 144] = [
    112.0, 118.0, 132.0, 129.0, 121.0, 135.0, 148.0, 148.0, 136.0, 119.0, 104.0, 118.0,
    115.0, 126.0, 141.0, 135.0, 125.0, 149.0, 170.0, 170.0, 158.0, 133.0, 114.0, 140.0,
    145.0, 150.0, 178.0, 163.0, 172.0, 178.0, 199.0, 199.0, 184.0, 162.0, 146.0, 166.0,
    171.0, 180.0, 193.0, 181.0, 183.0, 218.0, 230.0, 242.0, 209.0, 191.0, 172.0, 194.0,
    196.0, 196.0, 236.0, 235.0, 229.0, 243.0, 264.0, 272.0, 237.0, 211.0, 180.0, 201.0,
    204.0, 188.0, 235.0, 227.0, 234.0, 264.0, 302.0, 293.0, 259.0, 229.0, 203.0, 229.0,
    242.0, 233.0, 267.0, 269.0, 270.0, 315.0, 364.0, 347.0, 312.0, 274.0, 237.0, 278.0,
    284.0, 277.0, 317.0, 313.0, 318.0, 374.0, 413.0, 405.0, 355.0, 306.0, 271.0, 306.0,
    315.0, 301.0, 356.0, 348.0, 355.0, 422.0, 465.0, 467.0, 404.0, 347.0, 305.0, 336.0,
    340.0, 318.0, 362.0, 348.0, 363.0, 435.0, 491.0, 505.0, 404.0, 359.0, 310.0, 337.0,
    360.0, 342.0, 406.0, 396.0, 420.0, 472.0, 548.0, 559.0, 463.0, 407.0, 362.0, 405.0,
    417.0, 391.0, 419.0, 461.0, 472.0, 535.0, 622.0, 606.0, 508.0, 461.0, 390.0, 432.0,
];

fn month_start(index: usize) -> DateTime<Utc> {
    let year = 1949 + (index / 12) as i32;
    let month = (index % 12) as u32 + 1;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

fn airline() -> TimeSeries {
    let timestamps = (0..AIRLINE.len()).map(month_start).collect();
    TimeSeries::univariate(timestamps, AIRLINE.to_vec()).unwrap()
}

/// Train series plus the absolute horizon covering the test set.
fn airline_split() -> (TimeSeries, TimeSeries, ForecastingHorizon) {
    let (train, test) = temporal_train_test_split(&airline(), TEST_SIZE).unwrap();
    let fh = ForecastingHorizon::absolute(test.timestamps().to_vec()).unwrap();
    (train, test, fh)
}

fn concrete(strategy: Strategy, window_length: usize) -> BoxedForecaster {
    match strategy {
        Strategy::Recursive => Box::new(
            RecursiveForecaster::new(LinearRegression::new()).with_window_length(window_length),
        ),
        Strategy::Direct => Box::new(
            DirectForecaster::new(LinearRegression::new()).with_window_length(window_length),
        ),
        Strategy::DirRec => Box::new(
            DirRecForecaster::new(LinearRegression::new()).with_window_length(window_length),
        ),
        Strategy::MultiOutput => Box::new(
            MultioutputForecaster::new(LinearRegression::new()).with_window_length(window_length),
        ),
    }
}

#[test]
fn factory_matches_concrete_strategies() {
    let (train, _, fh) = airline_split();

    for strategy in Strategy::ALL {
        let mut expected = concrete(strategy, WINDOW_LENGTH);
        expected.fit(&train, Some(&fh)).unwrap();

        let mut via_factory = ReductionForecaster::from_strategy_name(
            RegressorSlot::single(LinearRegression::new()),
            strategy.as_str(),
            WINDOW_LENGTH,
        )
        .unwrap();
        via_factory.fit(&train, Some(&fh)).unwrap();

        let a = expected.predict(&fh).unwrap();
        let b = via_factory.predict(&fh).unwrap();
        assert_eq!(a, b, "factory differs for {}", strategy);
        assert_eq!(a.horizon(), TEST_SIZE);
    }
}

#[test]
fn windowed_factory_matches_tabular_factory() {
    let (train, _, fh) = airline_split();

    for strategy in Strategy::ALL {
        let config = ReductionConfig::new(strategy).with_window_length(WINDOW_LENGTH);
        let mut tabular =
            ReductionForecaster::new(RegressorSlot::single(LinearRegression::new()), config);
        let mut windowed = ReductionForecaster::windowed(
            RegressorSlot::single(Tabularizer::new(LinearRegression::new())),
            config,
        );
        tabular.fit(&train, Some(&fh)).unwrap();
        windowed.fit(&train, Some(&fh)).unwrap();

        assert_eq!(
            tabular.predict(&fh).unwrap().values(),
            windowed.predict(&fh).unwrap().values(),
            "windowed reduction differs for {}",
            strategy
        );
    }
}

#[test]
fn multioutput_agrees_with_direct_for_linear_regression() {
    let (train, _, fh) = airline_split();

    let mut direct =
        DirectForecaster::new(LinearRegression::new()).with_window_length(WINDOW_LENGTH);
    direct.fit(&train, Some(&fh)).unwrap();
    let mut multi =
        MultioutputForecaster::new(LinearRegression::new()).with_window_length(WINDOW_LENGTH);
    multi.fit(&train, Some(&fh)).unwrap();

    let a = direct.predict(&fh).unwrap();
    let b = multi.predict(&fh).unwrap();
    for (x, y) in a.values().iter().zip(b.values()) {
        assert!((x - y).abs() < 1e-5, "direct {} vs multioutput {}", x, y);
    }
}

#[test]
fn dirrec_broadcast_equals_regressor_list() {
    let (train, _, fh) = airline_split();

    let mut broadcast =
        DirRecForecaster::new(LinearRegression::new()).with_window_length(WINDOW_LENGTH);
    broadcast.fit(&train, Some(&fh)).unwrap();
    let mut listed = DirRecForecaster::per_step(vec![LinearRegression::new(); TEST_SIZE])
        .with_window_length(WINDOW_LENGTH);
    listed.fit(&train, Some(&fh)).unwrap();

    assert_eq!(broadcast.predict(&fh).unwrap(), listed.predict(&fh).unwrap());
}

#[test]
fn dirrec_rejects_wrong_regressor_count() {
    let (train, _, fh) = airline_split();

    for count in [TEST_SIZE - 1, TEST_SIZE + 1] {
        let mut model = DirRecForecaster::per_step(vec![LinearRegression::new(); count])
            .with_window_length(WINDOW_LENGTH);
        let err = model.fit(&train, Some(&fh)).unwrap_err();
        assert_eq!(
            err,
            ForecastError::RegressorCountMismatch {
                expected: TEST_SIZE,
                got: count
            }
        );
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains(&format!("expected {}", TEST_SIZE)));

        let fh_small = ForecastingHorizon::from_steps(1).unwrap();
        assert!(matches!(
            model.predict(&fh_small),
            Err(ForecastError::FitRequired)
        ));
    }
}

#[test]
fn dirrec_beats_recursive_on_trending_series() {
    let (train, test, fh) = airline_split();

    let mut recursive =
        RecursiveForecaster::new(LinearRegression::new()).with_window_length(WINDOW_LENGTH);
    recursive.fit(&train, Some(&fh)).unwrap();
    let mut dirrec =
        DirRecForecaster::new(LinearRegression::new()).with_window_length(WINDOW_LENGTH);
    dirrec.fit(&train, Some(&fh)).unwrap();

    let recursive_error = smape(test.values(), recursive.predict(&fh).unwrap().values()).unwrap();
    let dirrec_error = smape(test.values(), dirrec.predict(&fh).unwrap().values()).unwrap();

    assert!(
        dirrec_error < recursive_error,
        "dirrec sMAPE {} should be below recursive sMAPE {}",
        dirrec_error,
        recursive_error
    );
}

#[test]
fn forecasts_are_indexed_by_the_test_timestamps() {
    let (train, test, fh) = airline_split();

    for strategy in Strategy::ALL {
        let mut model = concrete(strategy, WINDOW_LENGTH);
        model.fit(&train, Some(&fh)).unwrap();
        let forecast = model.predict(&fh).unwrap();
        assert_eq!(forecast.timestamps().unwrap(), test.timestamps());
        assert_eq!(forecast.offsets()[0], 1);
    }
}

#[test]
fn monthly_horizons_follow_the_calendar() {
    let short = airline().slice(0, 36).unwrap();
    assert_eq!(short.resolved_frequency(), Some(Frequency::months(1)));

    let absolute = ForecastingHorizon::absolute((36..39).map(month_start).collect()).unwrap();
    let relative = ForecastingHorizon::from_steps(3).unwrap();

    let mut model = RecursiveForecaster::new(LinearRegression::new()).with_window_length(10);
    model.fit(&short, None).unwrap();
    let by_timestamp = model.predict(&absolute).unwrap();
    let by_step = model.predict(&relative).unwrap();

    assert_eq!(by_timestamp.offsets(), &[1, 2, 3]);
    assert_eq!(by_timestamp.values(), by_step.values());
    let expected: Vec<_> = (36..39).map(month_start).collect();
    assert_eq!(by_step.timestamps().unwrap(), expected.as_slice());
    assert!(by_step.timestamps().unwrap().iter().all(|t| t.day() == 1));
}

#[test]
fn forecast_index_past_the_calendar_range_is_an_error() {
    let start = Utc.with_ymd_and_hms(262_141, 6, 1, 0, 0, 0).unwrap();
    let timestamps = (0..30).map(|i| start + Duration::days(i)).collect();
    let values = (0..30).map(|i| (i % 7) as f64 + 0.1 * i as f64).collect();
    let series = TimeSeries::univariate(timestamps, values).unwrap();

    let mut model = RecursiveForecaster::new(LinearRegression::new()).with_window_length(5);
    model.fit(&series, None).unwrap();

    assert!(model.predict(&ForecastingHorizon::from_steps(3).unwrap()).is_ok());
    assert!(matches!(
        model.predict(&ForecastingHorizon::relative(vec![800]).unwrap()),
        Err(ForecastError::TimestampError(_))
    ));
}

#[test]
fn per_step_strategies_require_fit_horizon() {
    let (train, _, _) = airline_split();

    for strategy in [Strategy::Direct, Strategy::DirRec, Strategy::MultiOutput] {
        let mut model = concrete(strategy, WINDOW_LENGTH);
        assert!(matches!(
            model.fit(&train, None),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
    let mut recursive = concrete(Strategy::Recursive, WINDOW_LENGTH);
    assert!(recursive.fit(&train, None).is_ok());
}

#[test]
fn short_series_fails_with_insufficient_data() {
    let (train, _, _) = airline_split();
    let short = train.slice(0, 20).unwrap();
    let fh = ForecastingHorizon::from_steps(12).unwrap();

    for strategy in Strategy::ALL {
        let mut model = concrete(strategy, WINDOW_LENGTH);
        let result = model.fit(&short, Some(&fh));
        if strategy == Strategy::Recursive {
            assert!(result.is_ok());
        } else {
            assert!(matches!(
                result,
                Err(ForecastError::InsufficientData { needed: 22, got: 20 })
            ));
        }
    }
}

#[test]
fn malformed_horizons_are_rejected() {
    assert!(matches!(
        ForecastingHorizon::relative(vec![1, 2, 2]),
        Err(ForecastError::InvalidHorizon(_))
    ));
    assert!(matches!(
        ForecastingHorizon::relative(vec![0, 1]),
        Err(ForecastError::InvalidHorizon(_))
    ));
    assert!(ForecastingHorizon::relative(vec![]).is_err());

    // timestamps in the past resolve to non-positive offsets
    let (train, _, _) = airline_split();
    let mut model = concrete(Strategy::Recursive, WINDOW_LENGTH);
    model.fit(&train, None).unwrap();
    let past = ForecastingHorizon::absolute(vec![train.timestamps()[100]]).unwrap();
    assert!(matches!(
        model.predict(&past),
        Err(ForecastError::InvalidHorizon(_))
    ));
}

#[test]
fn update_extends_the_series_and_moves_the_cutoff() {
    let (train, test, _) = airline_split();
    let first_year = test.slice(0, 12).unwrap();
    let fh = ForecastingHorizon::from_steps(12).unwrap();

    for strategy in Strategy::ALL {
        let mut model = concrete(strategy, WINDOW_LENGTH);
        model.fit(&train, Some(&fh)).unwrap();
        let before = model.predict(&fh).unwrap();

        model.update(&first_year, true).unwrap();

        assert_eq!(model.cutoff(), first_year.last_timestamp());
        let after = model.predict(&fh).unwrap();
        assert_eq!(after.timestamps().unwrap()[0], test.timestamps()[12]);
        assert_ne!(before.values(), after.values());
    }
}

#[test]
fn update_before_fit_fails() {
    let (train, _, _) = airline_split();
    for strategy in Strategy::ALL {
        let mut model = concrete(strategy, WINDOW_LENGTH);
        assert!(matches!(
            model.update(&train, true),
            Err(ForecastError::FitRequired)
        ));
    }
}
