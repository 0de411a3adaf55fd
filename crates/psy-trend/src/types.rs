//! Result types of trend, seasonality, change-point and forecast analysis

use chrono::NaiveDate;
use psy_core::DataStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction of a linear trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Ascending,
    Descending,
    Stable,
    InsufficientData,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Ascending => write!(f, "ascending"),
            TrendDirection::Descending => write!(f, "descending"),
            TrendDirection::Stable => write!(f, "stable"),
            TrendDirection::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

/// Strength of evidence for a linear trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignificance {
    Significant,
    Moderate,
    NotSignificant,
    InsufficientData,
}

/// Outcome of the linear strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub direction: TrendDirection,
    pub significance: TrendSignificance,
    pub sample_size: usize,
}

impl TrendResult {
    /// Result for series too short to fit
    pub fn insufficient(sample_size: usize) -> Self {
        Self {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
            direction: TrendDirection::InsufficientData,
            significance: TrendSignificance::InsufficientData,
            sample_size,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.direction == TrendDirection::InsufficientData
    }

    /// Ascending or descending with at least moderate evidence
    pub fn is_meaningful(&self) -> bool {
        matches!(
            self.direction,
            TrendDirection::Ascending | TrendDirection::Descending
        ) && matches!(
            self.significance,
            TrendSignificance::Significant | TrendSignificance::Moderate
        )
    }
}

/// Average of one calendar month (1 = January)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthValue {
    pub month: u32,
    pub value: f64,
}

/// Outcome of the seasonal strategy
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPattern {
    pub status: DataStatus,
    pub monthly_averages: BTreeMap<u32, f64>,
    pub peaks: Vec<MonthValue>,
    pub valleys: Vec<MonthValue>,
    pub amplitude: f64,
    pub has_seasonality: bool,
}

impl SeasonalPattern {
    pub fn insufficient() -> Self {
        Self {
            status: DataStatus::InsufficientData,
            ..Self::default()
        }
    }
}

/// Direction of a detected level shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Improvement,
    Decline,
}

/// A significant shift of the local mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePoint {
    /// Index of the first point after the shift
    pub index: usize,
    pub date: NaiveDate,
    pub period_key: String,
    pub before_mean: f64,
    pub after_mean: f64,
    /// `after_mean - before_mean`
    pub magnitude: f64,
    pub change_type: ChangeType,
}

impl fmt::Display for ChangePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChangePoint {{ index: {}, period: {}, magnitude: {:+.2} }}",
            self.index, self.period_key, self.magnitude
        )
    }
}

/// Output of change-point detection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePointSet {
    pub status: DataStatus,
    /// Window size actually used, 0 when detection did not run
    pub window: usize,
    pub change_points: Vec<ChangePoint>,
}

impl ChangePointSet {
    pub fn insufficient() -> Self {
        Self {
            status: DataStatus::InsufficientData,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.change_points.len()
    }

    pub fn has_change_points(&self) -> bool {
        !self.change_points.is_empty()
    }

    /// The change point with the largest absolute magnitude
    pub fn most_significant(&self) -> Option<&ChangePoint> {
        self.change_points
            .iter()
            .max_by(|a, b| a.magnitude.abs().total_cmp(&b.magnitude.abs()))
    }

    pub fn declines(&self) -> impl Iterator<Item = &ChangePoint> {
        self.change_points
            .iter()
            .filter(|cp| cp.change_type == ChangeType::Decline)
    }
}

/// Symmetric band around a forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Forecast for one future period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// Steps ahead of the last observed period, starting at 1
    pub period: usize,
    pub date: NaiveDate,
    pub period_key: String,
    pub predicted_value: f64,
    pub confidence_interval: ConfidenceInterval,
}

/// Output of the forecast engine
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSet {
    pub status: DataStatus,
    pub slope: f64,
    pub intercept: f64,
    pub forecasts: Vec<Forecast>,
}

impl ForecastSet {
    pub fn insufficient() -> Self {
        Self {
            status: DataStatus::InsufficientData,
            ..Self::default()
        }
    }
}
