//! Property tests for the statistics engine and the outlier detector

use proptest::prelude::*;
use psy_descriptive::{describe, OutlierDetector};

fn percentiles(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..=100.0, min_len..200)
}

proptest! {
    #[test]
    fn quartiles_bracket_median(values in percentiles(1)) {
        let stats = describe(&values);
        prop_assert!(stats.q1 <= stats.median);
        prop_assert!(stats.median <= stats.q3);
        prop_assert!(stats.iqr >= 0.0);
    }

    #[test]
    fn mean_and_median_within_range(values in percentiles(1)) {
        let stats = describe(&values);
        prop_assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        prop_assert!(stats.min <= stats.median && stats.median <= stats.max);
        prop_assert_eq!(stats.count, values.len());
        prop_assert!(stats.variance >= 0.0);
    }

    #[test]
    fn outliers_lie_outside_fences(values in percentiles(0)) {
        let report = OutlierDetector::new().detect(&values);
        if values.len() < 4 {
            prop_assert!(report.outliers.is_empty());
        }
        let mut last_index = None;
        for outlier in &report.outliers {
            // reported fences are rounded to 2 decimals
            prop_assert!(
                outlier.value < report.lower_fence + 0.006
                    || outlier.value > report.upper_fence - 0.006
            );
            prop_assert_eq!(values[outlier.index], outlier.value);
            if let Some(previous) = last_index {
                prop_assert!(outlier.index > previous);
            }
            last_index = Some(outlier.index);
        }
    }

    #[test]
    fn constant_samples_have_no_outliers(value in 0.0f64..=100.0, len in 4usize..50) {
        let report = OutlierDetector::new().detect(&vec![value; len]);
        prop_assert!(report.outliers.is_empty());
    }
}
