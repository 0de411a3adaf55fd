//! Invariants of the trend components over arbitrary series

use chrono::NaiveDate;
use proptest::prelude::*;
use psy_core::{DataStatus, Period};
use psy_timeseries::TimeSeriesPoint;
use psy_trend::{ChangePointDetector, ForecastEngine, LinearTrend, TrendDirection};

fn series(values: &[f64]) -> Vec<TimeSeriesPoint> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let date = Period::Monthly.advance(start, i as i64).unwrap();
            TimeSeriesPoint::with_value(Period::Monthly.key(date), date, v)
        })
        .collect()
}

proptest! {
    #[test]
    fn forecasts_stay_on_percentile_scale(
        values in prop::collection::vec(0.0f64..100.0, 3..30),
        horizon in 1u32..=24,
    ) {
        let result = ForecastEngine::new()
            .forecast(&series(&values), horizon, Period::Monthly)
            .unwrap();
        prop_assert_eq!(result.status, DataStatus::Complete);
        prop_assert_eq!(result.forecasts.len(), horizon as usize);
        for (i, forecast) in result.forecasts.iter().enumerate() {
            prop_assert_eq!(forecast.period, i + 1);
            prop_assert!((1.0..=99.0).contains(&forecast.predicted_value));
            prop_assert!((1.0..=99.0).contains(&forecast.confidence_interval.lower));
            prop_assert!((1.0..=99.0).contains(&forecast.confidence_interval.upper));
            prop_assert!(forecast.confidence_interval.lower <= forecast.confidence_interval.upper);
        }
    }

    #[test]
    fn constant_series_has_no_change_points(value in 0.0f64..100.0, n in 6usize..40) {
        let result = ChangePointDetector::new().detect(&series(&vec![value; n]));
        prop_assert_eq!(result.status, DataStatus::Complete);
        prop_assert!(!result.has_change_points());
    }

    #[test]
    fn change_points_exceed_threshold_in_order(
        values in prop::collection::vec(0.0f64..100.0, 6..40),
    ) {
        let result = ChangePointDetector::new().detect(&series(&values));
        let mut last = 0;
        for cp in &result.change_points {
            prop_assert!(cp.magnitude.abs() > 10.0 - 0.01);
            prop_assert!(cp.index >= last);
            last = cp.index;
        }
    }

    #[test]
    fn r_squared_in_unit_interval(values in prop::collection::vec(0.0f64..100.0, 2..50)) {
        let result = LinearTrend::default().analyze_values(&values);
        prop_assert!((0.0..=1.0).contains(&result.r_squared));
        prop_assert_ne!(result.direction, TrendDirection::InsufficientData);
    }
}
