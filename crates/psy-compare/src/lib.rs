//! Cross-sectional comparisons of psychometric results
//!
//! - [`CorrelationAnalyzer`]: Pearson correlation between every pair of
//!   aptitudes over evaluations that hold all of them
//! - [`GroupComparisonEngine`]: per-group statistics with a pooled t-test
//!   (two groups) or one-way ANOVA (three or more), plus Cohen's d and η²
//!
//! Significance flags are fixed-threshold heuristics; see [`groups`].
//!
//! # Example
//!
//! ```rust
//! use psy_compare::{GroupComparisonEngine, SignificanceTest};
//! use std::collections::BTreeMap;
//!
//! let mut samples = BTreeMap::new();
//! samples.insert("A".to_string(), vec![20.0, 22.0, 24.0]);
//! samples.insert("B".to_string(), vec![60.0, 62.0, 64.0]);
//!
//! let comparison = GroupComparisonEngine::new().compare_samples("cohort", samples);
//! assert!(matches!(comparison.significance_test, Some(SignificanceTest::TTest(_))));
//! assert!(comparison.is_significant());
//! ```

pub mod correlation;
pub mod groups;

pub use correlation::{
    pearson, CorrelationAnalyzer, CorrelationEntry, CorrelationMatrix, CorrelationParameters,
    CorrelationReport, CorrelationStrength,
};
pub use groups::{
    AnovaResult, ComparisonParameters, GroupComparison, GroupComparisonEngine, GroupStats,
    SignificanceTest, TTestResult,
};
