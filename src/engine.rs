//! Analysis orchestration
//!
//! [`AnalyticsEngine::analyze`] validates its inputs, narrows the data to
//! the requested window and then runs three independent branches in
//! parallel:
//!
//! - **statistical**: descriptive statistics, levels and outliers
//! - **comparative**: correlations and group comparisons
//! - **trends**: period series, trend models, change points and forecast
//!
//! Each branch runs under [`safe_execute`]: a failure or panic in one branch
//! is logged and replaced by that branch's empty fallback section, while
//! validation errors and cancellation abort the whole run.

use chrono::Utc;
use psy_compare::{CorrelationAnalyzer, GroupComparisonEngine};
use psy_core::{
    safe_execute, AnalysisConfig, CancellationToken, Observation, RawObservation, Result,
    ValidationGuard,
};
use psy_descriptive::{DescriptiveStatistics, LevelDistribution, OutlierDetector};
use psy_timeseries::{filter_time_range, TimeSeriesAggregator};
use psy_trend::{
    ChangePointDetector, ForecastEngine, LinearTrend, TrendKind, TrendModel, TrendStrategy,
};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::insights::InsightEngine;
use crate::report::{
    AnalyticsReport, AptitudeSummary, AptitudeTrend, ComparativeReport, StatisticalReport,
    TrendReport,
};
use crate::settings::EngineSettings;
use crate::source::ObservationSource;

/// Entry point of the analytics engine
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    settings: EngineSettings,
    guard: ValidationGuard,
}

impl AnalyticsEngine {
    /// Engine with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom settings, which are validated first
    pub fn with_settings(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            guard: ValidationGuard::new(),
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Analyse already validated observations
    #[instrument(skip_all, fields(observations = observations.len(), period = %config.period))]
    pub fn analyze(
        &self,
        observations: &[Observation],
        config: &AnalysisConfig,
        cancel: &CancellationToken,
    ) -> Result<AnalyticsReport> {
        self.guard.validate_config(config)?;
        self.settings.validate()?;
        self.guard.check_observations(observations)?;
        cancel.check()?;

        let report_id = Uuid::new_v4();
        let (window, scoped) = filter_time_range(
            observations,
            config.period,
            config.time_range_in_periods,
            config.reference_date,
        )?;
        debug!(%report_id, kept = scoped.len(), ?window, "time range applied");
        cancel.check()?;

        let (statistical, (comparative, trends)) = rayon::join(
            || {
                safe_execute(
                    "statistical",
                    || self.statistical_report(&scoped, cancel),
                    StatisticalReport::default,
                )
            },
            || {
                rayon::join(
                    || {
                        safe_execute(
                            "comparative",
                            || self.comparative_report(&scoped, config, cancel),
                            ComparativeReport::default,
                        )
                    },
                    || {
                        safe_execute(
                            "trends",
                            || self.trend_report(&scoped, config, cancel),
                            || TrendReport::empty(config.period),
                        )
                    },
                )
            },
        );
        let statistical = statistical?;
        let comparative = comparative?;
        let trends = trends?;
        cancel.check()?;

        let (insights, recommendations) = InsightEngine::new(self.settings.insights.clone())
            .derive(&statistical.data, &comparative.data, &trends.data);

        let report = AnalyticsReport {
            report_id,
            generated_at: Utc::now(),
            config: config.clone(),
            window,
            observation_count: scoped.len(),
            source_status: None,
            statistical,
            comparative,
            trends,
            insights,
            recommendations,
        };

        if report.has_fallbacks() {
            warn!(%report_id, "report assembled with fallback sections");
        }
        info!(
            %report_id,
            insights = report.insights.len(),
            recommendations = report.recommendations.len(),
            "analysis finished"
        );
        Ok(report)
    }

    /// Validate raw records, then analyse them
    ///
    /// Any malformed record fails the whole request.
    pub fn analyze_raw(
        &self,
        records: &[RawObservation],
        config: &AnalysisConfig,
        cancel: &CancellationToken,
    ) -> Result<AnalyticsReport> {
        self.guard.validate_config(config)?;
        let observations = self.guard.validate_observations(records)?;
        self.analyze(&observations, config, cancel)
    }

    /// Fetch records from `source`, then analyse them
    ///
    /// A failing source is logged and analysed as an empty data set; the
    /// report's `source_status` records the fallback.
    pub fn analyze_source<S>(
        &self,
        source: &S,
        config: &AnalysisConfig,
        cancel: &CancellationToken,
    ) -> Result<AnalyticsReport>
    where
        S: ObservationSource + ?Sized,
    {
        self.guard.validate_config(config)?;
        cancel.check()?;
        let fetched = safe_execute("fetch", || source.fetch(config), Vec::new)?;
        let observations = self.guard.validate_observations(&fetched.data)?;

        let mut report = self.analyze(&observations, config, cancel)?;
        report.source_status = Some(fetched.status);
        Ok(report)
    }

    fn statistical_report(
        &self,
        observations: &[Observation],
        cancel: &CancellationToken,
    ) -> Result<StatisticalReport> {
        let engine = DescriptiveStatistics::new();
        let percentiles: Vec<f64> = observations.iter().map(|o| o.percentile).collect();

        let mut by_code: BTreeMap<&str, (&str, Vec<f64>)> = BTreeMap::new();
        for obs in observations {
            by_code
                .entry(obs.aptitude_code.as_str())
                .or_insert_with(|| (obs.display_name(), Vec::new()))
                .1
                .push(obs.percentile);
        }
        cancel.check()?;

        let by_aptitude = by_code
            .into_iter()
            .map(|(code, (name, values))| {
                let summary = AptitudeSummary {
                    code: code.to_string(),
                    name: name.to_string(),
                    stats: engine.compute(&values),
                    levels: LevelDistribution::from_percentiles(&values),
                };
                (code.to_string(), summary)
            })
            .collect();

        let evaluations: BTreeSet<&str> =
            observations.iter().map(|o| o.evaluation_id.as_str()).collect();
        let subjects: BTreeSet<&str> = observations
            .iter()
            .filter_map(|o| o.subject_id.as_deref())
            .collect();

        Ok(StatisticalReport {
            total_observations: observations.len(),
            total_evaluations: evaluations.len(),
            unique_subjects: subjects.len(),
            overall: engine.compute(&percentiles),
            levels: LevelDistribution::from_percentiles(&percentiles),
            by_aptitude,
            outliers: OutlierDetector::with_parameters(self.settings.outliers.clone())
                .detect(&percentiles),
        })
    }

    fn comparative_report(
        &self,
        observations: &[Observation],
        config: &AnalysisConfig,
        cancel: &CancellationToken,
    ) -> Result<ComparativeReport> {
        let correlations = CorrelationAnalyzer::with_parameters(self.settings.correlation.clone())
            .analyze(observations);
        cancel.check()?;

        let groups = GroupComparisonEngine::with_parameters(self.settings.comparison.clone());
        let aptitude_comparison =
            groups.compare_by(observations, "aptitude", |o| Some(o.aptitude_code.clone()));

        let (group_comparison, group_comparison_by_aptitude) = match config.group_by {
            Some(dimension) => {
                cancel.check()?;
                let mut per_aptitude: BTreeMap<&str, Vec<Observation>> = BTreeMap::new();
                for obs in observations {
                    per_aptitude
                        .entry(obs.aptitude_code.as_str())
                        .or_default()
                        .push(obs.clone());
                }
                let by_aptitude = per_aptitude
                    .into_iter()
                    .map(|(code, subset)| (code.to_string(), groups.compare(&subset, dimension)))
                    .collect();
                (Some(groups.compare(observations, dimension)), by_aptitude)
            }
            None => (None, BTreeMap::new()),
        };

        Ok(ComparativeReport {
            correlations,
            aptitude_comparison,
            group_comparison,
            group_comparison_by_aptitude,
        })
    }

    fn trend_report(
        &self,
        observations: &[Observation],
        config: &AnalysisConfig,
        cancel: &CancellationToken,
    ) -> Result<TrendReport> {
        let series = TimeSeriesAggregator::new(config.period)
            .with_group_by(config.group_by)
            .aggregate(observations);
        cancel.check()?;

        let general = TrendKind::ALL
            .iter()
            .map(|&kind| {
                let model = TrendModel::from_kind(kind, &self.settings.trend);
                (kind, model.analyze(&series.general))
            })
            .collect();

        let linear = LinearTrend::new(self.settings.trend.linear.clone());
        let detector = ChangePointDetector::with_parameters(self.settings.change_points.clone());

        let by_aptitude = series
            .by_aptitude
            .par_iter()
            .map(|(code, aptitude)| {
                cancel.check()?;
                let trend = AptitudeTrend {
                    code: code.clone(),
                    name: aptitude.name.clone(),
                    trend: linear.analyze_series(&aptitude.points),
                    change_points: detector.detect(&aptitude.points),
                };
                Ok((code.clone(), trend))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let by_group = series
            .by_group
            .iter()
            .flatten()
            .map(|(group, points)| (group.clone(), linear.analyze_series(points)))
            .collect();

        let change_points = detector.detect(&series.general);
        cancel.check()?;

        let forecast = if config.include_forecasting {
            let engine = ForecastEngine::with_parameters(self.settings.forecast.clone());
            Some(engine.forecast(&series.general, config.forecast_periods, config.period)?)
        } else {
            None
        };

        Ok(TrendReport {
            series,
            general,
            by_aptitude,
            by_group,
            change_points,
            forecast,
        })
    }
}
