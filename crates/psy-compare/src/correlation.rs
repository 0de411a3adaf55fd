//! Pearson correlation between aptitudes
//!
//! Results are pivoted to one row per evaluation holding the percentile of
//! each aptitude. Only evaluations that contain every aptitude present in
//! the input take part, so all pairs are computed over the same subjects.

use psy_core::numeric::round_to;
use psy_core::{DataStatus, Error, Observation, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Verbal strength bands of `|r|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    MuyDebil,
    Debil,
    Moderada,
    Fuerte,
    MuyFuerte,
}

impl CorrelationStrength {
    /// Band of a coefficient, cut at `|r|` 0.2, 0.4, 0.6 and 0.8
    pub fn from_coefficient(r: f64) -> Self {
        let magnitude = r.abs();
        if magnitude < 0.2 {
            Self::MuyDebil
        } else if magnitude < 0.4 {
            Self::Debil
        } else if magnitude < 0.6 {
            Self::Moderada
        } else if magnitude < 0.8 {
            Self::Fuerte
        } else {
            Self::MuyFuerte
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MuyDebil => "muy débil",
            Self::Debil => "débil",
            Self::Moderada => "moderada",
            Self::Fuerte => "fuerte",
            Self::MuyFuerte => "muy fuerte",
        }
    }
}

/// Correlation of one aptitude pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationEntry {
    pub aptitude_a: String,
    pub aptitude_b: String,
    /// Pearson r, rounded to 3 decimals
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

impl CorrelationEntry {
    pub fn is_positive(&self) -> bool {
        self.coefficient > 0.0
    }
}

/// Symmetric matrix of coefficients with a unit diagonal
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub aptitudes: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    fn identity(aptitudes: Vec<String>) -> Self {
        let k = aptitudes.len();
        let values = (0..k)
            .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Self { aptitudes, values }
    }

    fn index_of(&self, code: &str) -> Option<usize> {
        self.aptitudes.iter().position(|a| a == code)
    }

    /// Coefficient between two aptitude codes
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.values[i][j])
    }

    pub fn size(&self) -> usize {
        self.aptitudes.len()
    }
}

/// Output of the correlation analysis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationReport {
    pub status: DataStatus,
    /// Number of complete evaluations used
    pub sample_size: usize,
    /// Pairs sorted by descending `|r|`
    pub pairs: Vec<CorrelationEntry>,
    pub matrix: CorrelationMatrix,
}

impl CorrelationReport {
    pub fn insufficient(sample_size: usize) -> Self {
        Self {
            status: DataStatus::InsufficientData,
            sample_size,
            ..Self::default()
        }
    }

    pub fn strongest(&self) -> Option<&CorrelationEntry> {
        self.pairs.first()
    }

    /// Pairs with `|r| >= threshold`, strongest first
    pub fn strong_pairs(&self, threshold: f64) -> impl Iterator<Item = &CorrelationEntry> {
        self.pairs
            .iter()
            .filter(move |entry| entry.coefficient.abs() >= threshold)
    }
}

/// Correlation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorrelationParameters {
    /// Complete evaluations required before coefficients are reported
    pub min_complete_evaluations: usize,
}

impl Default for CorrelationParameters {
    fn default() -> Self {
        Self {
            min_complete_evaluations: 3,
        }
    }
}

impl CorrelationParameters {
    pub fn validate(&self) -> Result<()> {
        if self.min_complete_evaluations < 2 {
            return Err(Error::InvalidParameter(
                "correlation needs at least 2 complete evaluations".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pairwise Pearson correlation between aptitudes
#[derive(Debug, Clone, Default)]
pub struct CorrelationAnalyzer {
    params: CorrelationParameters,
}

impl CorrelationAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(params: CorrelationParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &CorrelationParameters {
        &self.params
    }

    pub fn analyze(&self, observations: &[Observation]) -> CorrelationReport {
        let aptitudes: BTreeSet<&str> = observations
            .iter()
            .map(|obs| obs.aptitude_code.as_str())
            .collect();

        // A repeated aptitude within one evaluation keeps the last value
        let mut by_evaluation: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
        for obs in observations {
            by_evaluation
                .entry(obs.evaluation_id.as_str())
                .or_default()
                .insert(obs.aptitude_code.as_str(), obs.percentile);
        }

        let rows: Vec<&BTreeMap<&str, f64>> = by_evaluation
            .values()
            .filter(|row| row.len() == aptitudes.len())
            .collect();

        debug!(
            aptitudes = aptitudes.len(),
            evaluations = by_evaluation.len(),
            complete = rows.len(),
            "correlation pivot built"
        );

        if aptitudes.len() < 2 || rows.len() < self.params.min_complete_evaluations {
            return CorrelationReport::insufficient(rows.len());
        }

        let codes: Vec<&str> = aptitudes.into_iter().collect();
        let columns: Vec<Vec<f64>> = codes
            .iter()
            .map(|code| rows.iter().map(|row| row[code]).collect())
            .collect();

        let mut matrix =
            CorrelationMatrix::identity(codes.iter().map(|c| c.to_string()).collect());
        let mut pairs = Vec::with_capacity(codes.len() * (codes.len() - 1) / 2);
        for i in 0..codes.len() {
            for j in i + 1..codes.len() {
                let r = round_to(pearson(&columns[i], &columns[j]), 3);
                matrix.values[i][j] = r;
                matrix.values[j][i] = r;
                pairs.push(CorrelationEntry {
                    aptitude_a: codes[i].to_string(),
                    aptitude_b: codes[j].to_string(),
                    coefficient: r,
                    strength: CorrelationStrength::from_coefficient(r),
                });
            }
        }
        // Stable sort keeps aptitude order among equal magnitudes
        pairs.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));

        CorrelationReport {
            status: DataStatus::Complete,
            sample_size: rows.len(),
            pairs,
            matrix,
        }
    }
}

/// Pearson correlation by the sum formula
///
/// A zero denominator (constant column) yields 0.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let (mut sx, mut sy, mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        sx += a;
        sy += b;
        sxy += a * b;
        sxx += a * a;
        syy += b * b;
    }
    let numerator = n_f * sxy - sx * sy;
    let denominator = ((n_f * sxx - sx * sx) * (n_f * syy - sy * sy)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (numerator / denominator).clamp(-1.0, 1.0)
}
