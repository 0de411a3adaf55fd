//! Common contract of the trend strategies

use psy_timeseries::TimeSeriesPoint;
use serde::{Deserialize, Serialize};

use crate::types::{SeasonalPattern, TrendResult};

/// Result of running a [`TrendStrategy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum TrendOutcome {
    Linear(TrendResult),
    Seasonal(SeasonalPattern),
}

impl TrendOutcome {
    pub fn as_linear(&self) -> Option<&TrendResult> {
        match self {
            TrendOutcome::Linear(result) => Some(result),
            TrendOutcome::Seasonal(_) => None,
        }
    }

    pub fn as_seasonal(&self) -> Option<&SeasonalPattern> {
        match self {
            TrendOutcome::Seasonal(pattern) => Some(pattern),
            TrendOutcome::Linear(_) => None,
        }
    }
}

/// Properties of a strategy that do not depend on the data
pub trait TrendStrategyProperties {
    /// Name under which the strategy is selected
    fn name(&self) -> &'static str;

    /// Shortest series producing a non-`insufficient_data` result
    fn minimum_sample_size(&self) -> usize;
}

/// A model classifying a time series
///
/// Strategies never fail: series that are too short yield an explicit
/// `insufficient_data` outcome.
pub trait TrendStrategy: TrendStrategyProperties + Send + Sync {
    fn analyze(&self, series: &[TimeSeriesPoint]) -> TrendOutcome;
}
