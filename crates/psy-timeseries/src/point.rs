//! Per-period aggregate

use chrono::NaiveDate;
use psy_descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

/// Aggregate statistics of one calendar period
///
/// Invariants: `count >= 1` and `min <= mean, median <= max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub period_key: String,
    /// First day of the period
    pub date: NaiveDate,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

impl TimeSeriesPoint {
    /// Build a point from the statistics of a non-empty bucket
    ///
    /// Returns `None` for empty statistics, which never form a period.
    pub fn from_stats(period_key: String, date: NaiveDate, stats: &DescriptiveStats) -> Option<Self> {
        if stats.is_empty() {
            return None;
        }
        Some(Self {
            period_key,
            date,
            count: stats.count,
            mean: stats.mean,
            median: stats.median,
            stddev: stats.stddev,
            min: stats.min,
            max: stats.max,
        })
    }

    /// A point carrying only a value, as used by tests and simple callers
    pub fn with_value(period_key: impl Into<String>, date: NaiveDate, value: f64) -> Self {
        Self {
            period_key: period_key.into(),
            date,
            count: 1,
            mean: value,
            median: value,
            stddev: 0.0,
            min: value,
            max: value,
        }
    }
}

/// Means of a series, in order
pub fn means(series: &[TimeSeriesPoint]) -> Vec<f64> {
    series.iter().map(|p| p.mean).collect()
}
