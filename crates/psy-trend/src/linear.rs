//! Linear trend strategy
//!
//! Fits an OLS line through the period means and classifies it:
//!
//! - **direction**: `|slope| < moderate_slope` is stable, otherwise the sign
//!   of the slope decides ascending/descending
//! - **significance**: combines `|slope|`, `r²` and the sample size; series
//!   shorter than `min_sample_size` are always `insufficient_data`

use psy_core::numeric::round_to;
use psy_core::{Error, Result};
use psy_timeseries::{means, TimeSeriesPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::regression::fit_linear;
use crate::traits::{TrendOutcome, TrendStrategy, TrendStrategyProperties};
use crate::types::{TrendDirection, TrendResult, TrendSignificance};

/// Thresholds of the linear strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearTrendParameters {
    /// Slope (percentile points per period) from which a trend is not stable
    pub moderate_slope: f64,
    /// Slope from which a trend can be significant
    pub significant_slope: f64,
    pub moderate_r_squared: f64,
    pub significant_r_squared: f64,
    /// Periods required before any significance is claimed
    pub min_sample_size: usize,
}

impl Default for LinearTrendParameters {
    fn default() -> Self {
        Self {
            moderate_slope: 0.5,
            significant_slope: 1.0,
            moderate_r_squared: 0.3,
            significant_r_squared: 0.6,
            min_sample_size: 3,
        }
    }
}

impl LinearTrendParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.moderate_slope >= 0.0 && self.moderate_slope <= self.significant_slope) {
            return Err(Error::InvalidParameter(format!(
                "linear trend slopes must satisfy 0 <= moderate ({}) <= significant ({})",
                self.moderate_slope, self.significant_slope
            )));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.moderate_r_squared)
            || !unit.contains(&self.significant_r_squared)
            || self.moderate_r_squared > self.significant_r_squared
        {
            return Err(Error::InvalidParameter(
                "linear trend r² thresholds must satisfy 0 <= moderate <= significant <= 1"
                    .to_string(),
            ));
        }
        if self.min_sample_size < 2 {
            return Err(Error::InvalidParameter(
                "linear trend needs a minimum sample size of at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// OLS trend classifier
#[derive(Debug, Clone, Default)]
pub struct LinearTrend {
    params: LinearTrendParameters,
}

impl LinearTrend {
    pub fn new(params: LinearTrendParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &LinearTrendParameters {
        &self.params
    }

    /// Classify a plain sequence of values
    pub fn analyze_values(&self, values: &[f64]) -> TrendResult {
        let n = values.len();
        let Some(fit) = fit_linear(values) else {
            return TrendResult::insufficient(n);
        };

        let magnitude = fit.slope.abs();
        let direction = if magnitude < self.params.moderate_slope {
            TrendDirection::Stable
        } else if fit.slope > 0.0 {
            TrendDirection::Ascending
        } else {
            TrendDirection::Descending
        };

        let significance = if n < self.params.min_sample_size {
            TrendSignificance::InsufficientData
        } else if magnitude >= self.params.significant_slope
            && fit.r_squared >= self.params.significant_r_squared
        {
            TrendSignificance::Significant
        } else if magnitude >= self.params.moderate_slope
            && fit.r_squared >= self.params.moderate_r_squared
        {
            TrendSignificance::Moderate
        } else {
            TrendSignificance::NotSignificant
        };

        debug!(
            n,
            slope = fit.slope,
            r_squared = fit.r_squared,
            ?direction,
            ?significance,
            "linear trend fitted"
        );

        TrendResult {
            slope: round_to(fit.slope, 3),
            intercept: round_to(fit.intercept, 2),
            r_squared: round_to(fit.r_squared, 3),
            direction,
            significance,
            sample_size: n,
        }
    }

    pub fn analyze_series(&self, series: &[TimeSeriesPoint]) -> TrendResult {
        self.analyze_values(&means(series))
    }
}

impl TrendStrategyProperties for LinearTrend {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.min_sample_size
    }
}

impl TrendStrategy for LinearTrend {
    fn analyze(&self, series: &[TimeSeriesPoint]) -> TrendOutcome {
        TrendOutcome::Linear(self.analyze_series(series))
    }
}
