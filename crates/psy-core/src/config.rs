//! Request-level analysis configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::observation::GroupBy;
use crate::period::Period;

/// Smallest accepted `time_range_in_periods`
pub const MIN_TIME_RANGE: u32 = 1;
/// Largest accepted `time_range_in_periods`
pub const MAX_TIME_RANGE: u32 = 120;
/// Largest accepted forecast horizon
pub const MAX_FORECAST_PERIODS: u32 = 24;

/// What the caller wants analysed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Bucket size of the time series
    pub period: Period,
    /// Number of trailing periods to analyse
    pub time_range_in_periods: u32,
    /// Demographic dimension for comparisons and per-group series
    pub group_by: Option<GroupBy>,
    pub include_forecasting: bool,
    /// Forecast horizon, in periods
    pub forecast_periods: u32,
    /// End of the analysed window; defaults to the latest observation
    pub reference_date: Option<NaiveDate>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            period: Period::Monthly,
            time_range_in_periods: 12,
            group_by: None,
            include_forecasting: false,
            forecast_periods: 3,
            reference_date: None,
        }
    }
}

impl AnalysisConfig {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    pub fn with_time_range(mut self, periods: u32) -> Self {
        self.time_range_in_periods = periods;
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    /// Enable forecasting `periods` steps ahead
    pub fn with_forecasting(mut self, periods: u32) -> Self {
        self.include_forecasting = true;
        self.forecast_periods = periods;
        self
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Parse a configuration sent by the host as JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::validation("config", json.trim(), e.to_string()))
    }
}
