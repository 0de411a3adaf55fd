//! Interquartile-range outlier detection
//!
//! A value is an outlier when it falls outside the Tukey fences
//! `[q1 - k * iqr, q3 + k * iqr]`, with `k = 1.5` by default.

use psy_core::numeric::round_to;
use psy_core::{DataStatus, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quantile::{quantile_sorted, sorted_finite};

/// Which fence an outlier crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierDirection {
    /// Above the upper fence
    Alto,
    /// Below the lower fence
    Bajo,
}

/// A flagged observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    /// Position in the input sequence
    pub index: usize,
    pub value: f64,
    pub direction: OutlierDirection,
}

/// Outcome of outlier detection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlierReport {
    pub status: DataStatus,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Flagged values, in input order
    pub outliers: Vec<Outlier>,
}

impl OutlierReport {
    /// The result reported for samples too small to fence
    pub fn insufficient() -> Self {
        Self {
            status: DataStatus::InsufficientData,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.outliers.len()
    }

    pub fn has_outliers(&self) -> bool {
        !self.outliers.is_empty()
    }

    /// Outliers on one side only
    pub fn by_direction(&self, direction: OutlierDirection) -> impl Iterator<Item = &Outlier> {
        self.outliers.iter().filter(move |o| o.direction == direction)
    }
}

/// Detector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutlierParameters {
    /// Fence multiplier applied to the IQR
    pub iqr_multiplier: f64,
    /// Smallest sample that is fenced at all
    pub min_sample_size: usize,
}

impl Default for OutlierParameters {
    fn default() -> Self {
        Self {
            iqr_multiplier: 1.5,
            min_sample_size: 4,
        }
    }
}

impl OutlierParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "IQR multiplier must be positive, got {}",
                self.iqr_multiplier
            )));
        }
        if self.min_sample_size == 0 {
            return Err(Error::InvalidParameter(
                "outlier detection needs a minimum sample size of at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// IQR-fence outlier detector
#[derive(Debug, Clone, Default)]
pub struct OutlierDetector {
    params: OutlierParameters,
}

impl OutlierDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(params: OutlierParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &OutlierParameters {
        &self.params
    }

    /// Flag the values of `values` lying outside the IQR fences
    ///
    /// Samples shorter than the minimum size yield an empty
    /// [`DataStatus::InsufficientData`] report rather than an error.
    pub fn detect(&self, values: &[f64]) -> OutlierReport {
        let sorted = sorted_finite(values);
        if sorted.len() < self.params.min_sample_size.max(1) {
            return OutlierReport::insufficient();
        }

        // Fences stay unrounded for the comparison; only the reported copy is rounded.
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let k = self.params.iqr_multiplier;
        let lower = q1 - k * (q3 - q1);
        let upper = q3 + k * (q3 - q1);
        let lower_fence = round_to(lower, 2);
        let upper_fence = round_to(upper, 2);

        let outliers = values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .filter_map(|(index, &value)| {
                let direction = if value > upper {
                    OutlierDirection::Alto
                } else if value < lower {
                    OutlierDirection::Bajo
                } else {
                    return None;
                };
                Some(Outlier {
                    index,
                    value,
                    direction,
                })
            })
            .collect::<Vec<_>>();
        debug!(lower_fence, upper_fence, count = outliers.len(), "outlier fences computed");

        OutlierReport {
            status: DataStatus::Complete,
            lower_fence,
            upper_fence,
            outliers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_samples_return_empty() {
        let detector = OutlierDetector::new();
        for sample in [&[][..], &[1.0][..], &[1.0, 2.0, 300.0][..]] {
            let report = detector.detect(sample);
            assert!(!report.has_outliers());
            assert_eq!(report.status, DataStatus::InsufficientData);
        }
    }

    #[test]
    fn test_flags_both_directions_in_input_order() {
        let data = [50.0, 52.0, 99.0, 48.0, 51.0, 49.0, 1.0, 50.0];
        let report = OutlierDetector::new().detect(&data);

        assert_eq!(report.status, DataStatus::Complete);
        let flagged: Vec<(usize, OutlierDirection)> =
            report.outliers.iter().map(|o| (o.index, o.direction)).collect();
        assert_eq!(
            flagged,
            vec![(2, OutlierDirection::Alto), (6, OutlierDirection::Bajo)]
        );
        assert_eq!(report.by_direction(OutlierDirection::Alto).count(), 1);
    }

    #[test]
    fn test_fences() {
        // q1 = 20, q3 = 40, iqr = 20 -> fences [-10, 70]
        let report = OutlierDetector::new().detect(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(report.lower_fence, -10.0);
        assert_eq!(report.upper_fence, 70.0);
        assert!(!report.has_outliers());
    }

    #[test]
    fn test_custom_multiplier() {
        let params = OutlierParameters {
            iqr_multiplier: 0.5,
            ..OutlierParameters::default()
        };
        let report = OutlierDetector::with_parameters(params).detect(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        // fences [10, 50] -> nothing strictly outside
        assert_eq!(report.count(), 0);

        let report = OutlierDetector::with_parameters(OutlierParameters {
            iqr_multiplier: 0.25,
            ..OutlierParameters::default()
        })
        .detect(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(report.count(), 2);
    }

    #[test]
    fn test_constant_fractional_sample_has_no_outliers() {
        let report = OutlierDetector::new().detect(&[55.555; 5]);
        assert_eq!(report.status, DataStatus::Complete);
        assert_eq!(report.lower_fence, 55.56);
        assert_eq!(report.upper_fence, 55.56);
        assert_eq!(report.count(), 0);
    }

    #[test]
    fn test_values_inside_unrounded_fence_are_kept() {
        // q1 = q3 = 10.004 -> both fences 10.004, reported as 10.0
        let data = [10.004, 10.004, 10.004, 10.004, 10.006];
        let report = OutlierDetector::new().detect(&data);
        assert_eq!(report.upper_fence, 10.0);
        let flagged: Vec<usize> = report.outliers.iter().map(|o| o.index).collect();
        assert_eq!(flagged, vec![4]);
        assert_eq!(report.outliers[0].direction, OutlierDirection::Alto);
    }

    #[test]
    fn test_deterministic() {
        let data = [3.0, 90.0, 4.0, 5.0, 6.0, 4.0, -70.0];
        let detector = OutlierDetector::new();
        assert_eq!(detector.detect(&data), detector.detect(&data));
    }
}
