//! Single-scan time-series aggregation
//!
//! One pass over the observations fills every requested series at once:
//! `general`, `by_aptitude` and, when a dimension is requested, `by_group`.
//! Buckets are keyed by the period anchor date in ordered maps, so each
//! output series is strictly ascending with unique period keys.

use chrono::NaiveDate;
use psy_core::{GroupBy, Observation, Period};
use psy_descriptive::DescriptiveStatistics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::point::TimeSeriesPoint;

type Buckets = BTreeMap<NaiveDate, Vec<f64>>;

/// The series of one aptitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AptitudeSeries {
    pub code: String,
    /// Display name carried from the observations
    pub name: String,
    pub points: Vec<TimeSeriesPoint>,
}

/// Output of [`TimeSeriesAggregator::aggregate`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSeries {
    pub period: Period,
    pub general: Vec<TimeSeriesPoint>,
    /// Keyed by aptitude code
    pub by_aptitude: BTreeMap<String, AptitudeSeries>,
    pub group_by: Option<GroupBy>,
    /// Keyed by the value of the requested demographic attribute
    pub by_group: Option<BTreeMap<String, Vec<TimeSeriesPoint>>>,
}

impl AggregatedSeries {
    pub fn is_empty(&self) -> bool {
        self.general.is_empty()
    }

    /// Empty series for `period`, used as a fallback
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }
}

/// Buckets observations into calendar periods
#[derive(Debug, Clone)]
pub struct TimeSeriesAggregator {
    period: Period,
    group_by: Option<GroupBy>,
    engine: DescriptiveStatistics,
}

impl TimeSeriesAggregator {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            group_by: None,
            engine: DescriptiveStatistics::new(),
        }
    }

    /// Also produce a per-group series for `dimension`
    pub fn with_group_by(mut self, dimension: Option<GroupBy>) -> Self {
        self.group_by = dimension;
        self
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Aggregate percentiles into the general, per-aptitude and per-group series
    pub fn aggregate(&self, observations: &[Observation]) -> AggregatedSeries {
        let mut general: Buckets = BTreeMap::new();
        let mut by_aptitude: BTreeMap<&str, (&str, Buckets)> = BTreeMap::new();
        let mut by_group: BTreeMap<&str, Buckets> = BTreeMap::new();

        for obs in observations {
            let anchor = self.period.anchor(obs.date());

            general.entry(anchor).or_default().push(obs.percentile);

            by_aptitude
                .entry(obs.aptitude_code.as_str())
                .or_insert_with(|| (obs.display_name(), BTreeMap::new()))
                .1
                .entry(anchor)
                .or_default()
                .push(obs.percentile);

            if let Some(key) = self.group_by.and_then(|dim| obs.attributes.get(dim)) {
                by_group
                    .entry(key)
                    .or_default()
                    .entry(anchor)
                    .or_default()
                    .push(obs.percentile);
            }
        }

        let general = self.build_points(general);
        let by_aptitude = by_aptitude
            .into_iter()
            .map(|(code, (name, buckets))| {
                let series = AptitudeSeries {
                    code: code.to_string(),
                    name: name.to_string(),
                    points: self.build_points(buckets),
                };
                (code.to_string(), series)
            })
            .collect::<BTreeMap<_, _>>();
        let by_group = self.group_by.map(|_| {
            by_group
                .into_iter()
                .map(|(key, buckets)| (key.to_string(), self.build_points(buckets)))
                .collect::<BTreeMap<_, _>>()
        });

        debug!(
            period = %self.period,
            periods = general.len(),
            aptitudes = by_aptitude.len(),
            groups = by_group.as_ref().map_or(0, |g| g.len()),
            "aggregated time series"
        );

        AggregatedSeries {
            period: self.period,
            general,
            by_aptitude,
            group_by: self.group_by,
            by_group,
        }
    }

    fn build_points(&self, buckets: Buckets) -> Vec<TimeSeriesPoint> {
        buckets
            .into_iter()
            .filter_map(|(anchor, values)| {
                let stats = self.engine.compute(&values);
                TimeSeriesPoint::from_stats(self.period.key(anchor), anchor, &stats)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDateTime;
    use psy_core::SubjectAttributes;

    fn obs(ts: &str, code: &str, pc: f64, gender: Option<&str>) -> Observation {
        Observation {
            evaluation_id: format!("{ts}-{code}"),
            subject_id: None,
            timestamp: NaiveDateTime::parse_from_str(&format!("{ts} 10:00:00"), "%Y-%m-%d %H:%M:%S")
                .unwrap(),
            aptitude_code: code.to_string(),
            aptitude_name: None,
            percentile: pc,
            direct_score: 10.0,
            attributes: SubjectAttributes {
                gender: gender.map(str::to_string),
                ..SubjectAttributes::default()
            },
        }
    }

    fn sample() -> Vec<Observation> {
        vec![
            obs("2024-03-15", "V", 60.0, Some("F")),
            obs("2024-01-10", "V", 40.0, Some("M")),
            obs("2024-01-20", "N", 80.0, Some("F")),
            obs("2024-02-05", "N", 20.0, None),
            obs("2024-03-01", "N", 70.0, Some("M")),
        ]
    }

    #[test]
    fn test_monthly_general_series() {
        let series = TimeSeriesAggregator::new(Period::Monthly).aggregate(&sample());
        let keys: Vec<&str> = series.general.iter().map(|p| p.period_key.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);

        let january = &series.general[0];
        assert_eq!(january.count, 2);
        assert_relative_eq!(january.mean, 60.0);
        assert_relative_eq!(january.min, 40.0);
        assert_relative_eq!(january.max, 80.0);
        assert!(series.by_group.is_none());
    }

    #[test]
    fn test_by_aptitude_carries_names() {
        let series = TimeSeriesAggregator::new(Period::Quarterly).aggregate(&sample());
        assert_eq!(series.by_aptitude.len(), 2);
        let verbal = &series.by_aptitude["V"];
        assert_eq!(verbal.name, "Aptitud Verbal");
        assert_eq!(verbal.points.len(), 1);
        assert_eq!(verbal.points[0].period_key, "2024-Q1");
        assert_relative_eq!(verbal.points[0].mean, 50.0);
    }

    #[test]
    fn test_by_group_skips_missing_attribute() {
        let series = TimeSeriesAggregator::new(Period::Monthly)
            .with_group_by(Some(GroupBy::Gender))
            .aggregate(&sample());
        let groups = series.by_group.unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["F", "M"]);
        let total: usize = groups.values().flatten().map(|p| p.count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_weekly_keys_are_mondays() {
        let series = TimeSeriesAggregator::new(Period::Weekly).aggregate(&sample());
        assert_eq!(series.general[0].period_key, "2024-01-08");
    }

    #[test]
    fn test_empty_input() {
        let series = TimeSeriesAggregator::new(Period::Daily)
            .with_group_by(Some(GroupBy::Institution))
            .aggregate(&[]);
        assert!(series.is_empty());
        assert!(series.by_aptitude.is_empty());
        assert_eq!(series.by_group, Some(BTreeMap::new()));
    }
}
