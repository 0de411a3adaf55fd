//! Linear-interpolation quantiles
//!
//! Uses the "type 7" definition: for probability `p` over `n` sorted values
//! the rank is `p * (n - 1)` and the result interpolates between the two
//! neighbouring order statistics.

use std::cmp::Ordering;

/// Quantile of already sorted data
///
/// Returns `0.0` for empty input. `p` is clamped into `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let weight = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

/// Percentile (0-100) of unsorted data
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let sorted = sorted_finite(values);
    quantile_sorted(&sorted, p / 100.0)
}

/// Copy of the finite values of `values`, in ascending order
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}
