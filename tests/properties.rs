//! Invariants of full analysis runs over arbitrary batteries

mod common;

use chrono::{Days, NaiveDate};
use common::observation;
use proptest::prelude::*;
use psy_analytics::{
    AnalysisConfig, AnalyticsEngine, CancellationToken, GroupBy, Observation, Period,
};

const CODES: &[&str] = &["V", "N", "R"];

/// Evaluations over two years, each scoring every aptitude
fn battery() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec(
        (0u64..730, prop::collection::vec(0.0f64..=100.0, 3), any::<bool>()),
        1..60,
    )
    .prop_map(|evaluations| {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        evaluations
            .into_iter()
            .enumerate()
            .flat_map(|(i, (offset, scores, female))| {
                let date = start + Days::new(offset);
                let gender = if female { "F" } else { "M" };
                CODES
                    .iter()
                    .zip(scores)
                    .map(move |(code, p)| observation(&format!("ev-{i}"), code, date, p, Some(gender)))
                    .collect::<Vec<_>>()
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn repeated_runs_produce_identical_sections(data in battery()) {
        let engine = AnalyticsEngine::new();
        let cancel = CancellationToken::new();
        let config = AnalysisConfig::new(Period::Monthly)
            .with_time_range(24)
            .with_group_by(GroupBy::Gender);

        let first = engine.analyze(&data, &config, &cancel).unwrap();
        let second = engine.analyze(&data, &config, &cancel).unwrap();

        prop_assert_eq!(&first.statistical, &second.statistical);
        prop_assert_eq!(&first.comparative, &second.comparative);
        prop_assert_eq!(&first.trends, &second.trends);
        prop_assert_eq!(&first.insights, &second.insights);
        prop_assert_eq!(&first.recommendations, &second.recommendations);
        prop_assert!(!first.has_fallbacks());
    }

    #[test]
    fn forecasts_stay_on_percentile_scale(data in battery(), horizon in 1u32..=24) {
        let config = AnalysisConfig::new(Period::Monthly)
            .with_time_range(24)
            .with_forecasting(horizon);
        let report = AnalyticsEngine::new()
            .analyze(&data, &config, &CancellationToken::new())
            .unwrap();

        let forecast = report.trends.data.forecast.as_ref().unwrap();
        for f in &forecast.forecasts {
            prop_assert!((1.0..=99.0).contains(&f.predicted_value));
            prop_assert!(f.confidence_interval.lower <= f.confidence_interval.upper);
        }
        if forecast.status.is_complete() {
            prop_assert_eq!(forecast.forecasts.len(), horizon as usize);
        }
    }
}
