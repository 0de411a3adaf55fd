//! Distribution of percentiles across the battery's interpretation bands

use psy_core::numeric::round_to;
use psy_core::PercentileLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count and share of observations per [`PercentileLevel`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub total: usize,
    /// Every level is present, including empty ones
    pub counts: BTreeMap<PercentileLevel, usize>,
}

impl LevelDistribution {
    /// Classify every finite percentile of `percentiles`
    pub fn from_percentiles(percentiles: &[f64]) -> Self {
        let mut counts: BTreeMap<PercentileLevel, usize> =
            PercentileLevel::ALL.iter().map(|&level| (level, 0)).collect();
        let mut total = 0;
        for &pc in percentiles.iter().filter(|v| v.is_finite()) {
            *counts.entry(PercentileLevel::from_percentile(pc)).or_insert(0) += 1;
            total += 1;
        }
        Self { total, counts }
    }

    pub fn count(&self, level: PercentileLevel) -> usize {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    /// Percentage of observations in `level`, 0 for an empty distribution
    pub fn percentage(&self, level: PercentileLevel) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        round_to(self.count(level) as f64 / self.total as f64 * 100.0, 2)
    }

    /// Percentage of observations at or below "Bajo"
    pub fn low_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let low = self.count(PercentileLevel::MuyBajo) + self.count(PercentileLevel::Bajo);
        round_to(low as f64 / self.total as f64 * 100.0, 2)
    }
}
