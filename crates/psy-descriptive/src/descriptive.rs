//! Descriptive statistics engine
//!
//! Computes central tendency, dispersion, shape and quartile statistics for
//! any numeric sample. Every other analytics component builds on this.
//!
//! Conventions:
//! - variance and standard deviation are *population* moments
//! - quartiles use linear interpolation (see [`crate::quantile`])
//! - skewness and excess kurtosis use the bias-corrected sample formulas
//! - moment statistics are rounded to 2 decimals, shape statistics to 3

use ordered_float::OrderedFloat;
use psy_core::numeric::round_to;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::quantile::{quantile_sorted, sorted_finite};

const MOMENT_DECIMALS: u32 = 2;
const SHAPE_DECIMALS: u32 = 3;

/// Summary statistics of a numeric sample
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; `None` when no value repeats
    pub mode: Option<f64>,
    pub variance: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub skewness: f64,
    /// Excess kurtosis (0 for a normal distribution)
    pub kurtosis: f64,
    pub count: usize,
    /// `stddev / mean * 100`, 0 when the mean is 0
    pub coefficient_of_variation: f64,
}

impl DescriptiveStats {
    /// The all-zero statistics reported for an empty sample
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Stateless descriptive statistics engine
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptiveStatistics;

impl DescriptiveStatistics {
    pub fn new() -> Self {
        Self
    }

    /// Compute statistics over `values`, ignoring non-finite entries
    pub fn compute(&self, values: &[f64]) -> DescriptiveStats {
        let sorted = sorted_finite(values);
        self.compute_sorted(&sorted)
    }

    /// Compute statistics over data already sorted ascending
    pub fn compute_sorted(&self, sorted: &[f64]) -> DescriptiveStats {
        let n = sorted.len();
        if n == 0 {
            return DescriptiveStats::empty();
        }

        let n_f = n as f64;
        let mean = sorted.iter().sum::<f64>() / n_f;
        let median = quantile_sorted(sorted, 0.5);
        let q1 = quantile_sorted(sorted, 0.25);
        let q3 = quantile_sorted(sorted, 0.75);
        let min = sorted[0];
        let max = sorted[n - 1];

        let sum_sq: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum();
        let variance = sum_sq / n_f;
        let stddev = variance.sqrt();

        let coefficient_of_variation = if mean == 0.0 {
            0.0
        } else {
            stddev / mean * 100.0
        };

        DescriptiveStats {
            mean: round_to(mean, MOMENT_DECIMALS),
            median: round_to(median, MOMENT_DECIMALS),
            mode: mode(sorted).map(|m| round_to(m, MOMENT_DECIMALS)),
            variance: round_to(variance, MOMENT_DECIMALS),
            stddev: round_to(stddev, MOMENT_DECIMALS),
            min: round_to(min, MOMENT_DECIMALS),
            max: round_to(max, MOMENT_DECIMALS),
            range: round_to(max - min, MOMENT_DECIMALS),
            q1: round_to(q1, MOMENT_DECIMALS),
            q3: round_to(q3, MOMENT_DECIMALS),
            iqr: round_to(q3 - q1, MOMENT_DECIMALS),
            skewness: round_to(skewness(sorted, mean, sum_sq), SHAPE_DECIMALS),
            kurtosis: round_to(excess_kurtosis(sorted, mean, sum_sq), SHAPE_DECIMALS),
            count: n,
            coefficient_of_variation: round_to(coefficient_of_variation, MOMENT_DECIMALS),
        }
    }
}

/// Convenience wrapper around [`DescriptiveStatistics::compute`]
pub fn describe(values: &[f64]) -> DescriptiveStats {
    DescriptiveStatistics::new().compute(values)
}

/// Most frequent value, smallest among ties; `None` if every value is distinct
fn mode(sorted: &[f64]) -> Option<f64> {
    let mut counts: HashMap<OrderedFloat<f64>, usize> = HashMap::with_capacity(sorted.len());
    for &x in sorted {
        *counts.entry(OrderedFloat(x)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
        .map(|(value, _)| value.into_inner())
}

/// Sample standard deviation from the sum of squared deviations
fn sample_stddev(n: usize, sum_sq: f64) -> f64 {
    (sum_sq / (n as f64 - 1.0)).sqrt()
}

/// Bias-corrected sample skewness, 0 when undefined
fn skewness(sorted: &[f64], mean: f64, sum_sq: f64) -> f64 {
    let n = sorted.len();
    if n < 3 {
        return 0.0;
    }
    let s = sample_stddev(n, sum_sq);
    if s == 0.0 {
        return 0.0;
    }
    let n_f = n as f64;
    let cubed: f64 = sorted.iter().map(|x| ((x - mean) / s).powi(3)).sum();
    n_f / ((n_f - 1.0) * (n_f - 2.0)) * cubed
}

/// Bias-corrected sample excess kurtosis, 0 when undefined
fn excess_kurtosis(sorted: &[f64], mean: f64, sum_sq: f64) -> f64 {
    let n = sorted.len();
    if n < 4 {
        return 0.0;
    }
    let s = sample_stddev(n, sum_sq);
    if s == 0.0 {
        return 0.0;
    }
    let n_f = n as f64;
    let fourth: f64 = sorted.iter().map(|x| ((x - mean) / s).powi(4)).sum();
    let scale = n_f * (n_f + 1.0) / ((n_f - 1.0) * (n_f - 2.0) * (n_f - 3.0));
    let correction = 3.0 * (n_f - 1.0).powi(2) / ((n_f - 2.0) * (n_f - 3.0));
    scale * fourth - correction
}
