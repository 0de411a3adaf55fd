//! Strategy selection

use psy_core::{Error, Result};
use psy_timeseries::TimeSeriesPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::linear::{LinearTrend, LinearTrendParameters};
use crate::seasonal::{SeasonalParameters, SeasonalTrend};
use crate::traits::{TrendOutcome, TrendStrategy, TrendStrategyProperties};

/// Available trend models
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendKind {
    Linear,
    Seasonal,
}

impl TrendKind {
    pub const ALL: [TrendKind; 2] = [TrendKind::Linear, TrendKind::Seasonal];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendKind::Linear => "linear",
            TrendKind::Seasonal => "seasonal",
        }
    }
}

impl fmt::Display for TrendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(TrendKind::Linear),
            "seasonal" => Ok(TrendKind::Seasonal),
            other => Err(Error::validation(
                "trend_kind",
                other,
                "expected one of: linear, seasonal",
            )),
        }
    }
}

/// Parameters of every trend model
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendParameters {
    pub linear: LinearTrendParameters,
    pub seasonal: SeasonalParameters,
}

impl TrendParameters {
    pub fn validate(&self) -> Result<()> {
        self.linear.validate()?;
        self.seasonal.validate()
    }
}

/// A configured trend model
#[derive(Debug, Clone)]
pub enum TrendModel {
    Linear(LinearTrend),
    Seasonal(SeasonalTrend),
}

impl TrendModel {
    /// Build the model for `kind` from the shared parameters
    pub fn from_kind(kind: TrendKind, params: &TrendParameters) -> Self {
        match kind {
            TrendKind::Linear => TrendModel::Linear(LinearTrend::new(params.linear.clone())),
            TrendKind::Seasonal => {
                TrendModel::Seasonal(SeasonalTrend::new(params.seasonal.clone()))
            }
        }
    }

    pub fn kind(&self) -> TrendKind {
        match self {
            TrendModel::Linear(_) => TrendKind::Linear,
            TrendModel::Seasonal(_) => TrendKind::Seasonal,
        }
    }
}

impl TrendStrategyProperties for TrendModel {
    fn name(&self) -> &'static str {
        match self {
            TrendModel::Linear(model) => model.name(),
            TrendModel::Seasonal(model) => model.name(),
        }
    }

    fn minimum_sample_size(&self) -> usize {
        match self {
            TrendModel::Linear(model) => model.minimum_sample_size(),
            TrendModel::Seasonal(model) => model.minimum_sample_size(),
        }
    }
}

impl TrendStrategy for TrendModel {
    fn analyze(&self, series: &[TimeSeriesPoint]) -> TrendOutcome {
        match self {
            TrendModel::Linear(model) => model.analyze(series),
            TrendModel::Seasonal(model) => model.analyze(series),
        }
    }
}
