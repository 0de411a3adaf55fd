//! Sliding-window mean shift detection
//!
//! For every index `i` with a full window on both sides the mean of the `w`
//! points before `i` is compared with the mean of the `w` points starting
//! at `i`. Shifts larger than `threshold` percentile points are reported.

use psy_core::numeric::{mean, round_to};
use psy_core::{DataStatus, Error, Result};
use psy_timeseries::{means, TimeSeriesPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ChangePoint, ChangePointSet, ChangeType};

/// Change-point detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePointParameters {
    /// Minimum `|after - before|` for a shift to be reported
    pub threshold: f64,
    /// Series length required when the window is chosen automatically
    pub min_points: usize,
    /// Upper bound of the automatic window
    pub max_window: usize,
    /// Fixed window; requires at least `2 * window` points
    pub window: Option<usize>,
}

impl Default for ChangePointParameters {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            min_points: 6,
            max_window: 3,
            window: None,
        }
    }
}

impl ChangePointParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "change point threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        if self.max_window == 0 || self.window == Some(0) {
            return Err(Error::InvalidParameter(
                "change point window must be at least 1".to_string(),
            ));
        }
        if self.min_points < 2 {
            return Err(Error::InvalidParameter(
                "change point detection needs at least 2 points".to_string(),
            ));
        }
        Ok(())
    }
}

/// Detects level shifts in a period series
#[derive(Debug, Clone, Default)]
pub struct ChangePointDetector {
    params: ChangePointParameters,
}

impl ChangePointDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(params: ChangePointParameters) -> Self {
        Self { params }
    }

    /// Detector with a fixed window size
    pub fn with_window(window: usize) -> Self {
        Self::with_parameters(ChangePointParameters {
            window: Some(window),
            ..ChangePointParameters::default()
        })
    }

    pub fn parameters(&self) -> &ChangePointParameters {
        &self.params
    }

    /// Window used for a series of length `n`, `None` when it is too short
    pub fn window_for(&self, n: usize) -> Option<usize> {
        match self.params.window {
            Some(w) if w >= 1 && n >= 2 * w => Some(w),
            Some(_) => None,
            None if n >= self.params.min_points => {
                Some(self.params.max_window.min(n / 3)).filter(|&w| w >= 1)
            }
            None => None,
        }
    }

    pub fn detect(&self, series: &[TimeSeriesPoint]) -> ChangePointSet {
        let values = means(series);
        let n = values.len();
        let Some(w) = self.window_for(n) else {
            debug!(n, "series too short for change point detection");
            return ChangePointSet::insufficient();
        };

        let change_points: Vec<ChangePoint> = (w..=n - w)
            .filter_map(|i| {
                let before = mean(&values[i - w..i]);
                let after = mean(&values[i..i + w]);
                let magnitude = after - before;
                if magnitude.abs() <= self.params.threshold {
                    return None;
                }
                let point = &series[i];
                Some(ChangePoint {
                    index: i,
                    date: point.date,
                    period_key: point.period_key.clone(),
                    before_mean: round_to(before, 2),
                    after_mean: round_to(after, 2),
                    magnitude: round_to(magnitude, 2),
                    change_type: if magnitude > 0.0 {
                        ChangeType::Improvement
                    } else {
                        ChangeType::Decline
                    },
                })
            })
            .collect();

        debug!(n, window = w, found = change_points.len(), "change point scan finished");

        ChangePointSet {
            status: DataStatus::Complete,
            window: w,
            change_points,
        }
    }
}
