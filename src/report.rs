//! Report types handed to the rendering layer

use chrono::{DateTime, Utc};
use psy_compare::{CorrelationReport, GroupComparison};
use psy_core::{AnalysisConfig, Error, Period, Result, Section, SectionStatus};
use psy_descriptive::{DescriptiveStats, LevelDistribution, OutlierReport};
use psy_timeseries::{AggregatedSeries, TimeWindow};
use psy_trend::{
    ChangePointSet, ForecastSet, SeasonalPattern, TrendKind, TrendOutcome, TrendResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::insights::{Insight, Recommendation};

/// Statistics of one aptitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeSummary {
    pub code: String,
    pub name: String,
    pub stats: DescriptiveStats,
    pub levels: LevelDistribution,
}

/// Descriptive section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticalReport {
    pub total_observations: usize,
    pub total_evaluations: usize,
    pub unique_subjects: usize,
    /// Statistics of all percentiles
    pub overall: DescriptiveStats,
    pub levels: LevelDistribution,
    /// Keyed by aptitude code
    pub by_aptitude: BTreeMap<String, AptitudeSummary>,
    /// Indices refer to the analysed observations
    pub outliers: OutlierReport,
}

impl StatisticalReport {
    /// Aptitudes with the highest and the lowest mean
    pub fn aptitude_extremes(&self) -> Option<(&AptitudeSummary, &AptitudeSummary)> {
        let mut iter = self.by_aptitude.values();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(hi, lo), cur| {
            (
                if cur.stats.mean > hi.stats.mean { cur } else { hi },
                if cur.stats.mean < lo.stats.mean { cur } else { lo },
            )
        }))
    }
}

/// Cross-sectional section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeReport {
    pub correlations: CorrelationReport,
    /// Aptitudes compared with each other
    pub aptitude_comparison: GroupComparison,
    /// Requested demographic dimension over all percentiles
    pub group_comparison: Option<GroupComparison>,
    /// Requested demographic dimension within each aptitude
    pub group_comparison_by_aptitude: BTreeMap<String, GroupComparison>,
}

/// Trend and change points of one aptitude series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AptitudeTrend {
    pub code: String,
    pub name: String,
    pub trend: TrendResult,
    pub change_points: ChangePointSet,
}

/// Time-series section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub series: AggregatedSeries,
    /// Every trend model run over the general series
    pub general: BTreeMap<TrendKind, TrendOutcome>,
    pub by_aptitude: BTreeMap<String, AptitudeTrend>,
    /// Linear trend of each demographic group series
    pub by_group: BTreeMap<String, TrendResult>,
    pub change_points: ChangePointSet,
    pub forecast: Option<ForecastSet>,
}

impl TrendReport {
    /// Report with no series, used as a fallback
    pub fn empty(period: Period) -> Self {
        Self {
            series: AggregatedSeries::empty(period),
            general: BTreeMap::new(),
            by_aptitude: BTreeMap::new(),
            by_group: BTreeMap::new(),
            change_points: ChangePointSet::insufficient(),
            forecast: None,
        }
    }

    /// Linear trend of the general series
    pub fn linear(&self) -> Option<&TrendResult> {
        self.general
            .get(&TrendKind::Linear)
            .and_then(TrendOutcome::as_linear)
    }

    pub fn seasonality(&self) -> Option<&SeasonalPattern> {
        self.general
            .get(&TrendKind::Seasonal)
            .and_then(TrendOutcome::as_seasonal)
    }
}

/// Complete output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub config: AnalysisConfig,
    /// Analysed date range, `None` without observations
    pub window: Option<TimeWindow>,
    /// Observations inside the window
    pub observation_count: usize,
    /// How the observations were obtained when fetched from a source
    pub source_status: Option<SectionStatus>,
    pub statistical: Section<StatisticalReport>,
    pub comparative: Section<ComparativeReport>,
    pub trends: Section<TrendReport>,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

impl AnalyticsReport {
    /// Whether any section was replaced by its fallback
    pub fn has_fallbacks(&self) -> bool {
        self.statistical.is_fallback() || self.comparative.is_fallback() || self.trends.is_fallback()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Computation(format!("report: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Computation(format!("report: {e}")))
    }
}
