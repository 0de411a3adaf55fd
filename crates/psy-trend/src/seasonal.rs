//! Month-of-year seasonality

use chrono::Datelike;
use psy_core::numeric::{mean, round_to};
use psy_core::{DataStatus, Error, Result};
use psy_timeseries::TimeSeriesPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::traits::{TrendOutcome, TrendStrategy, TrendStrategyProperties};
use crate::types::{MonthValue, SeasonalPattern};

/// Parameters of the seasonal strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeasonalParameters {
    /// Points required before monthly averages are considered
    pub min_periods: usize,
    /// Distance from the mean, in standard deviations, marking a peak or valley
    pub deviation_factor: f64,
}

impl Default for SeasonalParameters {
    fn default() -> Self {
        Self {
            min_periods: 4,
            deviation_factor: 1.0,
        }
    }
}

impl SeasonalParameters {
    pub fn validate(&self) -> Result<()> {
        if self.min_periods < 2 {
            return Err(Error::InvalidParameter(
                "seasonal analysis needs at least 2 periods".to_string(),
            ));
        }
        if !(self.deviation_factor.is_finite() && self.deviation_factor >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "seasonal deviation factor must be finite and non-negative, got {}",
                self.deviation_factor
            )));
        }
        Ok(())
    }
}

/// Averages point means per calendar month and flags outlying months
#[derive(Debug, Clone, Default)]
pub struct SeasonalTrend {
    params: SeasonalParameters,
}

impl SeasonalTrend {
    pub fn new(params: SeasonalParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &SeasonalParameters {
        &self.params
    }

    pub fn detect(&self, series: &[TimeSeriesPoint]) -> SeasonalPattern {
        if series.len() < self.params.min_periods {
            return SeasonalPattern::insufficient();
        }

        let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for point in series {
            by_month.entry(point.date.month()).or_default().push(point.mean);
        }
        let monthly_averages: BTreeMap<u32, f64> = by_month
            .into_iter()
            .map(|(month, values)| (month, mean(&values)))
            .collect();

        let averages: Vec<f64> = monthly_averages.values().copied().collect();
        let center = mean(&averages);
        let spread = (averages.iter().map(|v| (v - center).powi(2)).sum::<f64>()
            / averages.len() as f64)
            .sqrt();
        let upper = center + self.params.deviation_factor * spread;
        let lower = center - self.params.deviation_factor * spread;

        let mut peaks = Vec::new();
        let mut valleys = Vec::new();
        if spread > 0.0 {
            for (&month, &value) in &monthly_averages {
                let entry = MonthValue {
                    month,
                    value: round_to(value, 2),
                };
                if value > upper {
                    peaks.push(entry);
                } else if value < lower {
                    valleys.push(entry);
                }
            }
        }

        let max = averages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = averages.iter().copied().fold(f64::INFINITY, f64::min);
        let has_seasonality = !peaks.is_empty() || !valleys.is_empty();

        debug!(
            months = monthly_averages.len(),
            peaks = peaks.len(),
            valleys = valleys.len(),
            "seasonal pattern computed"
        );

        SeasonalPattern {
            status: DataStatus::Complete,
            monthly_averages: monthly_averages
                .into_iter()
                .map(|(month, value)| (month, round_to(value, 2)))
                .collect(),
            peaks,
            valleys,
            amplitude: round_to(max - min, 2),
            has_seasonality,
        }
    }
}

impl TrendStrategyProperties for SeasonalTrend {
    fn name(&self) -> &'static str {
        "seasonal"
    }

    fn minimum_sample_size(&self) -> usize {
        self.params.min_periods
    }
}

impl TrendStrategy for SeasonalTrend {
    fn analyze(&self, series: &[TimeSeriesPoint]) -> TrendOutcome {
        TrendOutcome::Seasonal(self.detect(series))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn monthly(values: &[(i32, u32, f64)]) -> Vec<TimeSeriesPoint> {
        values
            .iter()
            .map(|&(y, m, v)| {
                let date = NaiveDate::from_ymd_opt(y, m, 1).unwrap();
                TimeSeriesPoint::with_value(format!("{y}-{m:02}"), date, v)
            })
            .collect()
    }

    #[test]
    fn test_insufficient_periods() {
        let pattern = SeasonalTrend::default().detect(&monthly(&[(2024, 1, 50.0), (2024, 2, 55.0)]));
        assert_eq!(pattern.status, DataStatus::InsufficientData);
        assert!(!pattern.has_seasonality);
        assert!(pattern.monthly_averages.is_empty());
    }

    #[test]
    fn test_peak_month_detected() {
        let series = monthly(&[
            (2024, 1, 50.0),
            (2024, 2, 50.0),
            (2024, 3, 50.0),
            (2024, 4, 80.0),
            (2024, 5, 50.0),
        ]);
        let pattern = SeasonalTrend::default().detect(&series);
        assert_eq!(pattern.status, DataStatus::Complete);
        assert!(pattern.has_seasonality);
        assert_eq!(pattern.peaks, vec![MonthValue { month: 4, value: 80.0 }]);
        assert!(pattern.valleys.is_empty());
        assert_relative_eq!(pattern.amplitude, 30.0);
    }

    #[test]
    fn test_same_month_across_years_is_averaged() {
        let series = monthly(&[
            (2023, 6, 40.0),
            (2023, 7, 60.0),
            (2024, 6, 60.0),
            (2024, 7, 60.0),
        ]);
        let pattern = SeasonalTrend::default().detect(&series);
        assert_relative_eq!(pattern.monthly_averages[&6], 50.0);
        assert_relative_eq!(pattern.monthly_averages[&7], 60.0);
        assert_relative_eq!(pattern.amplitude, 10.0);
    }

    #[test]
    fn test_flat_series_has_no_seasonality() {
        let points: Vec<(i32, u32, f64)> = (1..=12).map(|m| (2024, m, 50.0)).collect();
        let pattern = SeasonalTrend::default().detect(&monthly(&points));
        assert_eq!(pattern.status, DataStatus::Complete);
        assert_eq!(pattern.monthly_averages.len(), 12);
        assert!(pattern.monthly_averages.values().all(|&v| v == 50.0));
        assert!(pattern.peaks.is_empty());
        assert!(pattern.valleys.is_empty());
        assert!(!pattern.has_seasonality);
        assert_eq!(pattern.amplitude, 0.0);
    }
}
