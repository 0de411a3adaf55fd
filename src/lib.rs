//! Analytics engine for psychometric test battery results
//!
//! The engine turns flat result records into the sections of an analytics
//! report:
//!
//! - descriptive statistics, percentile levels and outliers
//! - inter-aptitude correlations and demographic group comparisons
//! - period series with linear and seasonal trends, change points and an
//!   optional forecast
//! - rule-based insights and recommendations
//!
//! The analytical building blocks live in the workspace crates and are
//! re-exported here:
//!
//! | Crate | Contents |
//! |---|---|
//! | [`psy_core`] | data model, periods, validation, errors, cancellation |
//! | [`psy_descriptive`] | descriptive statistics and outlier detection |
//! | [`psy_timeseries`] | calendar aggregation |
//! | [`psy_trend`] | trend strategies, change points, forecasts |
//! | [`psy_compare`] | correlations, t-test and ANOVA |
//!
//! # Example
//!
//! ```rust
//! use psy_analytics::{AnalysisConfig, AnalyticsEngine, CancellationToken, Period, RawObservation};
//!
//! let records: Vec<RawObservation> = (1..=6u32)
//!     .map(|month| RawObservation {
//!         evaluation_id: Some(format!("ev-{month}")),
//!         timestamp: Some(format!("2024-{month:02}-10")),
//!         aptitude_code: Some("R".into()),
//!         percentile: Some(40.0 + 5.0 * month as f64),
//!         direct_score: Some(20.0),
//!         ..RawObservation::default()
//!     })
//!     .collect();
//!
//! let config = AnalysisConfig::new(Period::Monthly).with_time_range(12);
//! let report = AnalyticsEngine::new()
//!     .analyze_raw(&records, &config, &CancellationToken::new())
//!     .unwrap();
//!
//! assert_eq!(report.observation_count, 6);
//! assert!(!report.has_fallbacks());
//! ```

pub mod engine;
pub mod insights;
pub mod report;
pub mod settings;
pub mod source;

pub use psy_compare;
pub use psy_core;
pub use psy_descriptive;
pub use psy_timeseries;
pub use psy_trend;

pub use engine::AnalyticsEngine;
pub use insights::{
    Insight, InsightEngine, InsightKind, InsightParameters, Priority, Recommendation, Severity,
};
pub use psy_core::{
    AnalysisConfig, CancellationToken, DataStatus, Error, GroupBy, Observation, Period,
    RawObservation, Result, Section, SectionStatus,
};
pub use report::{
    AnalyticsReport, AptitudeSummary, AptitudeTrend, ComparativeReport, StatisticalReport,
    TrendReport,
};
pub use settings::EngineSettings;
pub use source::{InMemorySource, ObservationSource};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
