//! Demographic group comparison
//!
//! Percentiles are split by a grouping key and summarised per group. With
//! exactly two groups a pooled-variance t-test is run, with more a one-way
//! ANOVA.
//!
//! # Approximation
//!
//! The `significant` flags use fixed critical values (`|t| > 2`, `F > 3`)
//! rather than the distributions' quantiles. The exact p-values are
//! reported alongside for information only.

use psy_core::numeric::{mean, round_to};
use psy_core::{Error, GroupBy, Observation, Result};
use psy_descriptive::{DescriptiveStatistics, DescriptiveStats};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Critical values of the significance heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonParameters {
    /// Two groups differ when `|t|` exceeds this
    pub t_threshold: f64,
    /// Several groups differ when `F` exceeds this
    pub f_threshold: f64,
}

impl Default for ComparisonParameters {
    fn default() -> Self {
        Self {
            t_threshold: 2.0,
            f_threshold: 3.0,
        }
    }
}

impl ComparisonParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.t_threshold.is_finite() && self.t_threshold > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "t threshold must be positive, got {}",
                self.t_threshold
            )));
        }
        if !(self.f_threshold.is_finite() && self.f_threshold > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "F threshold must be positive, got {}",
                self.f_threshold
            )));
        }
        Ok(())
    }
}

/// Summary of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub stats: DescriptiveStats,
    pub sample_size: usize,
}

/// Pooled two-sample t-test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TTestResult {
    pub group_a: String,
    pub group_b: String,
    pub t_statistic: f64,
    pub degrees_of_freedom: usize,
    /// Two-sided p-value, informational
    pub p_value: Option<f64>,
    /// Mean difference over the pooled standard deviation
    pub cohens_d: f64,
    pub significant: bool,
}

/// One-way analysis of variance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub df_between: usize,
    pub df_within: usize,
    /// Upper-tail p-value, informational
    pub p_value: Option<f64>,
    /// Share of the total variance explained by group membership
    pub eta_squared: f64,
    pub significant: bool,
}

/// Test chosen by the number of groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", rename_all = "snake_case")]
pub enum SignificanceTest {
    TTest(TTestResult),
    Anova(AnovaResult),
}

impl SignificanceTest {
    pub fn is_significant(&self) -> bool {
        match self {
            SignificanceTest::TTest(t) => t.significant,
            SignificanceTest::Anova(a) => a.significant,
        }
    }
}

/// Per-group statistics and the test between them
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupComparison {
    pub dimension: String,
    pub groups: BTreeMap<String, GroupStats>,
    /// `None` with fewer than two groups
    pub significance_test: Option<SignificanceTest>,
}

impl GroupComparison {
    pub fn is_significant(&self) -> bool {
        self.significance_test
            .as_ref()
            .is_some_and(SignificanceTest::is_significant)
    }

    /// Groups with the highest and lowest mean
    pub fn extremes(&self) -> Option<((&str, f64), (&str, f64))> {
        let mut iter = self.groups.iter().map(|(k, g)| (k.as_str(), g.stats.mean));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(hi, lo), cur| {
            (
                if cur.1 > hi.1 { cur } else { hi },
                if cur.1 < lo.1 { cur } else { lo },
            )
        }))
    }
}

/// Compares percentile distributions across groups
#[derive(Debug, Clone, Default)]
pub struct GroupComparisonEngine {
    params: ComparisonParameters,
}

impl GroupComparisonEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(params: ComparisonParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &ComparisonParameters {
        &self.params
    }

    /// Compare by a demographic attribute
    ///
    /// Observations without the attribute are left out.
    pub fn compare(&self, observations: &[Observation], group_by: GroupBy) -> GroupComparison {
        self.compare_by(observations, group_by.as_str(), |obs| {
            obs.attributes.get(group_by).map(str::to_string)
        })
    }

    /// Compare by an arbitrary key; `None` keys are left out
    pub fn compare_by<F>(&self, observations: &[Observation], dimension: &str, key: F) -> GroupComparison
    where
        F: Fn(&Observation) -> Option<String>,
    {
        let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for obs in observations {
            if let Some(k) = key(obs) {
                samples.entry(k).or_default().push(obs.percentile);
            }
        }
        self.compare_samples(dimension, samples)
    }

    /// Compare pre-grouped samples
    #[instrument(skip(self, samples), fields(groups = samples.len()))]
    pub fn compare_samples(
        &self,
        dimension: &str,
        samples: BTreeMap<String, Vec<f64>>,
    ) -> GroupComparison {
        let engine = DescriptiveStatistics::new();
        let samples: BTreeMap<String, Vec<f64>> = samples
            .into_iter()
            .map(|(k, v)| (k, v.into_iter().filter(|x| x.is_finite()).collect::<Vec<_>>()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        let groups = samples
            .iter()
            .map(|(k, v)| {
                (
                    k.clone(),
                    GroupStats {
                        stats: engine.compute(v),
                        sample_size: v.len(),
                    },
                )
            })
            .collect();

        let significance_test = match samples.len() {
            0 | 1 => None,
            2 => {
                let mut iter = samples.iter();
                match (iter.next(), iter.next()) {
                    (Some((ka, a)), Some((kb, b))) => {
                        Some(SignificanceTest::TTest(self.t_test(ka, a, kb, b)))
                    }
                    _ => None,
                }
            }
            _ => {
                let values: Vec<&[f64]> = samples.values().map(Vec::as_slice).collect();
                Some(SignificanceTest::Anova(self.anova(&values)))
            }
        };

        debug!(
            dimension,
            significant = significance_test
                .as_ref()
                .is_some_and(SignificanceTest::is_significant),
            "group comparison finished"
        );

        GroupComparison {
            dimension: dimension.to_string(),
            groups,
            significance_test,
        }
    }

    /// Student t-test with pooled sample variances
    pub fn t_test(&self, name_a: &str, a: &[f64], name_b: &str, b: &[f64]) -> TTestResult {
        let (n1, n2) = (a.len(), b.len());
        let (m1, m2) = (mean(a), mean(b));
        let df = (n1 + n2).saturating_sub(2);

        let (t, d) = if df == 0 {
            (0.0, 0.0)
        } else {
            let pooled_var = (sum_sq(a, m1) + sum_sq(b, m2)) / df as f64;
            let pooled_sd = pooled_var.sqrt();
            let se = (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
            let diff = m1 - m2;
            let t = if se > 0.0 {
                diff / se
            } else if diff == 0.0 {
                0.0
            } else {
                diff.signum() * f64::INFINITY
            };
            let d = if pooled_sd > 0.0 { diff / pooled_sd } else { 0.0 };
            (t, d)
        };

        let p_value = if df == 0 {
            None
        } else if t.is_infinite() {
            Some(0.0)
        } else {
            StudentsT::new(0.0, 1.0, df as f64)
                .ok()
                .map(|dist| round_to(2.0 * dist.sf(t.abs()), 4))
        };

        TTestResult {
            group_a: name_a.to_string(),
            group_b: name_b.to_string(),
            t_statistic: round_to(t, 3),
            degrees_of_freedom: df,
            p_value,
            cohens_d: round_to(d, 3),
            significant: t.abs() > self.params.t_threshold,
        }
    }

    /// One-way ANOVA over any number of groups
    pub fn anova(&self, groups: &[&[f64]]) -> AnovaResult {
        let k = groups.len();
        let n: usize = groups.iter().map(|g| g.len()).sum();
        let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n.max(1) as f64;

        let mut ss_between = 0.0;
        let mut ss_within = 0.0;
        for group in groups.iter().filter(|g| !g.is_empty()) {
            let m = mean(group);
            ss_between += group.len() as f64 * (m - grand_mean).powi(2);
            ss_within += sum_sq(group, m);
        }

        // Rounding noise from identical groups must not read as a difference
        let ss_between = snap_to_zero(ss_between);
        let ss_within = snap_to_zero(ss_within);

        let df_between = k.saturating_sub(1);
        let df_within = n.saturating_sub(k);
        let f = if df_within == 0 || df_between == 0 {
            0.0
        } else {
            let ms_between = ss_between / df_between as f64;
            let ms_within = ss_within / df_within as f64;
            if ms_within > 0.0 {
                ms_between / ms_within
            } else if ms_between > 0.0 {
                f64::INFINITY
            } else {
                0.0
            }
        };

        let ss_total = ss_between + ss_within;
        let eta_squared = if ss_total > 0.0 { ss_between / ss_total } else { 0.0 };

        let p_value = if df_within == 0 || df_between == 0 {
            None
        } else if f.is_infinite() {
            Some(0.0)
        } else {
            FisherSnedecor::new(df_between as f64, df_within as f64)
                .ok()
                .map(|dist| round_to(dist.sf(f), 4))
        };

        AnovaResult {
            f_statistic: round_to(f, 3),
            df_between,
            df_within,
            p_value,
            eta_squared: round_to(eta_squared, 3),
            significant: f > self.params.f_threshold,
        }
    }
}

const SUM_OF_SQUARES_EPSILON: f64 = 1e-9;

fn snap_to_zero(value: f64) -> f64 {
    if value.abs() < SUM_OF_SQUARES_EPSILON {
        0.0
    } else {
        value
    }
}

fn sum_sq(values: &[f64], center: f64) -> f64 {
    values.iter().map(|x| (x - center).powi(2)).sum()
}
