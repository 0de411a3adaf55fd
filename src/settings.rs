//! Engine-wide tuning parameters
//!
//! Every threshold of every component lives in one of the parameter structs
//! aggregated here. All of them have documented defaults and can be loaded
//! from JSON; missing fields keep their default.

use psy_compare::{ComparisonParameters, CorrelationParameters};
use psy_core::{Error, Result};
use psy_descriptive::OutlierParameters;
use psy_trend::{ChangePointParameters, ForecastParameters, TrendParameters};
use serde::{Deserialize, Serialize};

use crate::insights::InsightParameters;

/// Parameters of every analysis component
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub outliers: OutlierParameters,
    pub trend: TrendParameters,
    pub change_points: ChangePointParameters,
    pub forecast: ForecastParameters,
    pub correlation: CorrelationParameters,
    pub comparison: ComparisonParameters,
    pub insights: InsightParameters,
}

impl EngineSettings {
    /// Check every component's parameters
    pub fn validate(&self) -> Result<()> {
        self.outliers.validate()?;
        self.trend.validate()?;
        self.change_points.validate()?;
        self.forecast.validate()?;
        self.correlation.validate()?;
        self.comparison.validate()?;
        self.insights.validate()
    }

    /// Parse and validate settings supplied as JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidParameter(format!("engine settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Computation(format!("engine settings: {e}")))
    }
}
