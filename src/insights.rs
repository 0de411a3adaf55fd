//! Threshold rules turning report sections into insights and recommendations
//!
//! Messages are written in Spanish, the language of the battery's reports.

use psy_compare::GroupComparison;
use psy_core::{Error, Result};
use psy_descriptive::OutlierDirection;
use psy_trend::{TrendDirection, TrendSignificance};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::report::{ComparativeReport, StatisticalReport, TrendReport};

/// Thresholds of the insight rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightParameters {
    /// Mean gap between best and worst aptitude flagged as inconsistent
    pub aptitude_range: f64,
    /// Overall mean at or above which performance is high
    pub high_mean: f64,
    /// Overall mean at or below which performance is low
    pub low_mean: f64,
    /// Coefficient of variation (%) above which dispersion is high
    pub high_variability: f64,
    /// `|r|` from which a correlation is reported
    pub strong_correlation: f64,
    /// Share (%) of results in the low bands that warrants attention
    pub low_level_share: f64,
    /// Observations below which the whole analysis is flagged as thin
    pub min_observations: usize,
    /// Cap on reported correlation pairs
    pub max_correlation_insights: usize,
}

impl Default for InsightParameters {
    fn default() -> Self {
        Self {
            aptitude_range: 30.0,
            high_mean: 70.0,
            low_mean: 30.0,
            high_variability: 50.0,
            strong_correlation: 0.6,
            low_level_share: 40.0,
            min_observations: 10,
            max_correlation_insights: 3,
        }
    }
}

impl InsightParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.low_mean < self.high_mean) {
            return Err(Error::InvalidParameter(format!(
                "insight means must satisfy low ({}) < high ({})",
                self.low_mean, self.high_mean
            )));
        }
        if !(0.0..=1.0).contains(&self.strong_correlation) {
            return Err(Error::InvalidParameter(format!(
                "strong correlation threshold must lie in [0, 1], got {}",
                self.strong_correlation
            )));
        }
        if !(self.aptitude_range >= 0.0
            && self.high_variability >= 0.0
            && (0.0..=100.0).contains(&self.low_level_share))
        {
            return Err(Error::InvalidParameter(
                "insight thresholds must be non-negative percentages".to_string(),
            ));
        }
        Ok(())
    }
}

/// What an insight is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    InsufficientData,
    AptitudeInconsistency,
    HighPerformance,
    LowPerformance,
    LowLevelConcentration,
    HighVariability,
    Outliers,
    StrongCorrelation,
    GroupDifference,
    PositiveTrend,
    NegativeTrend,
    Decline,
    Seasonality,
}

/// How an insight should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Positive,
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    /// Insight that triggered the recommendation
    pub source: InsightKind,
    pub message: String,
}

/// Applies [`InsightParameters`] to the report sections
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    params: InsightParameters,
}

impl InsightEngine {
    pub fn new(params: InsightParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &InsightParameters {
        &self.params
    }

    /// Insights in rule order and recommendations sorted by priority
    pub fn derive(
        &self,
        statistical: &StatisticalReport,
        comparative: &ComparativeReport,
        trends: &TrendReport,
    ) -> (Vec<Insight>, Vec<Recommendation>) {
        let mut insights = Vec::new();
        self.data_volume(statistical, trends, &mut insights);
        self.performance(statistical, &mut insights);
        self.dispersion(statistical, &mut insights);
        self.correlations(comparative, &mut insights);
        self.groups(comparative, &mut insights);
        self.trends(trends, &mut insights);

        let mut recommendations: Vec<Recommendation> = insights
            .iter()
            .filter_map(|insight| recommend(insight, statistical))
            .collect();
        recommendations.sort_by_key(|r| r.priority);
        let mut seen = HashSet::new();
        recommendations.retain(|r| seen.insert(r.message.clone()));
        (insights, recommendations)
    }

    fn data_volume(&self, stats: &StatisticalReport, trends: &TrendReport, out: &mut Vec<Insight>) {
        if stats.total_observations < self.params.min_observations {
            out.push(Insight::new(
                InsightKind::InsufficientData,
                Severity::Warning,
                format!(
                    "Solo hay {} resultados en el periodo analizado; las conclusiones son poco fiables.",
                    stats.total_observations
                ),
            ));
        } else if trends.linear().is_some_and(|t| t.is_insufficient()) {
            out.push(Insight::new(
                InsightKind::InsufficientData,
                Severity::Info,
                "No hay periodos suficientes para estimar una tendencia temporal.",
            ));
        }
    }

    fn performance(&self, stats: &StatisticalReport, out: &mut Vec<Insight>) {
        if stats.overall.count == 0 {
            return;
        }
        if let Some((top, bottom)) = stats.aptitude_extremes() {
            let gap = top.stats.mean - bottom.stats.mean;
            if stats.by_aptitude.len() >= 2 && gap > self.params.aptitude_range {
                out.push(Insight::new(
                    InsightKind::AptitudeInconsistency,
                    Severity::Warning,
                    format!(
                        "Perfil desigual: {} (media {:.1}) supera a {} (media {:.1}) en {:.1} puntos.",
                        top.name, top.stats.mean, bottom.name, bottom.stats.mean, gap
                    ),
                ));
            }
        }

        let mean = stats.overall.mean;
        if mean >= self.params.high_mean {
            out.push(Insight::new(
                InsightKind::HighPerformance,
                Severity::Positive,
                format!("Rendimiento general alto: percentil medio {mean:.1}."),
            ));
        } else if mean <= self.params.low_mean {
            out.push(Insight::new(
                InsightKind::LowPerformance,
                Severity::Critical,
                format!("Rendimiento general bajo: percentil medio {mean:.1}."),
            ));
        }

        let low_share = stats.levels.low_percentage();
        if low_share >= self.params.low_level_share {
            out.push(Insight::new(
                InsightKind::LowLevelConcentration,
                Severity::Warning,
                format!("El {low_share:.1}% de los resultados se sitúa en niveles bajo o muy bajo."),
            ));
        }
    }

    fn dispersion(&self, stats: &StatisticalReport, out: &mut Vec<Insight>) {
        let cv = stats.overall.coefficient_of_variation;
        if stats.overall.count > 1 && cv > self.params.high_variability {
            out.push(Insight::new(
                InsightKind::HighVariability,
                Severity::Info,
                format!("Alta heterogeneidad en los resultados (coeficiente de variación {cv:.1}%)."),
            ));
        }

        if stats.outliers.has_outliers() {
            let high = stats.outliers.by_direction(OutlierDirection::Alto).count();
            let low = stats.outliers.by_direction(OutlierDirection::Bajo).count();
            out.push(Insight::new(
                InsightKind::Outliers,
                Severity::Info,
                format!(
                    "Se detectaron {} valores atípicos ({high} altos, {low} bajos).",
                    stats.outliers.count()
                ),
            ));
        }
    }

    fn correlations(&self, comparative: &ComparativeReport, out: &mut Vec<Insight>) {
        for pair in comparative
            .correlations
            .strong_pairs(self.params.strong_correlation)
            .take(self.params.max_correlation_insights)
        {
            let sense = if pair.is_positive() { "positiva" } else { "negativa" };
            out.push(Insight::new(
                InsightKind::StrongCorrelation,
                Severity::Info,
                format!(
                    "Correlación {sense} {} entre {} y {} (r = {:.2}).",
                    pair.strength.label(),
                    psy_core::aptitude::display_name(&pair.aptitude_a),
                    psy_core::aptitude::display_name(&pair.aptitude_b),
                    pair.coefficient
                ),
            ));
        }
    }

    fn groups(&self, comparative: &ComparativeReport, out: &mut Vec<Insight>) {
        if let Some(comparison) = &comparative.group_comparison {
            if let Some(insight) = group_insight(comparison) {
                out.push(insight);
            }
        }
    }

    fn trends(&self, trends: &TrendReport, out: &mut Vec<Insight>) {
        if let Some(trend) = trends.linear().filter(|t| t.is_meaningful()) {
            let strength = if trend.significance == TrendSignificance::Significant {
                "significativa"
            } else {
                "moderada"
            };
            match trend.direction {
                TrendDirection::Ascending => out.push(Insight::new(
                    InsightKind::PositiveTrend,
                    Severity::Positive,
                    format!(
                        "Tendencia ascendente {strength}: +{:.2} puntos por periodo (R² = {:.2}).",
                        trend.slope, trend.r_squared
                    ),
                )),
                TrendDirection::Descending => out.push(Insight::new(
                    InsightKind::NegativeTrend,
                    Severity::Warning,
                    format!(
                        "Tendencia descendente {strength}: {:.2} puntos por periodo (R² = {:.2}).",
                        trend.slope, trend.r_squared
                    ),
                )),
                _ => {}
            }
        }

        for cp in trends.change_points.declines() {
            out.push(Insight::new(
                InsightKind::Decline,
                Severity::Critical,
                format!(
                    "Caída de {:.1} puntos a partir de {} (de {:.1} a {:.1}).",
                    cp.magnitude.abs(),
                    cp.period_key,
                    cp.before_mean,
                    cp.after_mean
                ),
            ));
        }
        for aptitude in trends.by_aptitude.values() {
            if let Some(cp) = aptitude.change_points.declines().next() {
                out.push(Insight::new(
                    InsightKind::Decline,
                    Severity::Warning,
                    format!(
                        "{}: caída de {:.1} puntos a partir de {}.",
                        aptitude.name,
                        cp.magnitude.abs(),
                        cp.period_key
                    ),
                ));
            }
        }

        if let Some(pattern) = trends.seasonality().filter(|p| p.has_seasonality) {
            let months: Vec<String> = pattern.peaks.iter().map(|p| month_name(p.month)).collect();
            let message = if months.is_empty() {
                format!(
                    "Variación estacional de {:.1} puntos entre meses.",
                    pattern.amplitude
                )
            } else {
                format!(
                    "Patrón estacional: mejores resultados en {} (amplitud {:.1}).",
                    months.join(", "),
                    pattern.amplitude
                )
            };
            out.push(Insight::new(InsightKind::Seasonality, Severity::Info, message));
        }
    }
}

fn group_insight(comparison: &GroupComparison) -> Option<Insight> {
    if !comparison.is_significant() {
        return None;
    }
    let ((top, top_mean), (bottom, bottom_mean)) = comparison.extremes()?;
    Some(Insight::new(
        InsightKind::GroupDifference,
        Severity::Warning,
        format!(
            "Diferencias relevantes por {}: {} (media {:.1}) frente a {} (media {:.1}).",
            comparison.dimension, top, top_mean, bottom, bottom_mean
        ),
    ))
}

fn recommend(insight: &Insight, stats: &StatisticalReport) -> Option<Recommendation> {
    let (priority, message) = match insight.kind {
        InsightKind::InsufficientData => (
            Priority::Low,
            "Ampliar la muestra o el rango temporal antes de extraer conclusiones.".to_string(),
        ),
        InsightKind::AptitudeInconsistency => {
            let (_, weakest) = stats.aptitude_extremes()?;
            (
                Priority::High,
                format!("Diseñar un refuerzo específico en {}.", weakest.name),
            )
        }
        InsightKind::LowPerformance | InsightKind::LowLevelConcentration => (
            Priority::High,
            "Implementar un programa de apoyo para los evaluados con percentiles bajos.".to_string(),
        ),
        InsightKind::HighPerformance => (
            Priority::Low,
            "Ofrecer actividades de enriquecimiento para mantener el rendimiento.".to_string(),
        ),
        InsightKind::HighVariability => (
            Priority::Medium,
            "Considerar estrategias diferenciadas según el nivel de cada grupo.".to_string(),
        ),
        InsightKind::Outliers => (
            Priority::Medium,
            "Revisar individualmente los casos atípicos y la validez de su aplicación.".to_string(),
        ),
        InsightKind::GroupDifference => (
            Priority::Medium,
            "Analizar los factores asociados a las diferencias entre grupos.".to_string(),
        ),
        InsightKind::NegativeTrend | InsightKind::Decline => (
            Priority::High,
            "Investigar las causas del descenso y planificar una intervención.".to_string(),
        ),
        InsightKind::StrongCorrelation
        | InsightKind::PositiveTrend
        | InsightKind::Seasonality => return None,
    };
    Some(Recommendation {
        priority,
        source: insight.kind,
        message,
    })
}

fn month_name(month: u32) -> String {
    const NAMES: [&str; 12] = [
        "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
        "septiembre", "octubre", "noviembre", "diciembre",
    ];
    NAMES
        .get(month.wrapping_sub(1) as usize)
        .map_or_else(|| month.to_string(), |name| name.to_string())
}
