//! Trailing time window selection

use chrono::{Days, NaiveDate};
use psy_core::{Observation, Period, Result};
use serde::{Deserialize, Serialize};

/// Inclusive date range covering whole periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    /// The last `periods` periods ending with the one containing `reference`
    pub fn trailing(period: Period, periods: u32, reference: NaiveDate) -> Result<Self> {
        let last_anchor = period.anchor(reference);
        let start = period.advance(last_anchor, -(i64::from(periods.max(1)) - 1))?;
        let next = period.advance(last_anchor, 1)?;
        let end = next.checked_sub_days(Days::new(1)).unwrap_or(next);
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Keep the observations falling in the trailing window
///
/// `reference` defaults to the latest observation date. Returns `None` as
/// the window when there is nothing to anchor it to.
pub fn filter_time_range(
    observations: &[Observation],
    period: Period,
    periods: u32,
    reference: Option<NaiveDate>,
) -> Result<(Option<TimeWindow>, Vec<Observation>)> {
    let reference = match reference.or_else(|| observations.iter().map(Observation::date).max()) {
        Some(date) => date,
        None => return Ok((None, Vec::new())),
    };

    let window = TimeWindow::trailing(period, periods, reference)?;
    let kept = observations
        .iter()
        .filter(|obs| window.contains(obs.date()))
        .cloned()
        .collect();
    Ok((Some(window), kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use psy_core::SubjectAttributes;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn obs(date: NaiveDate) -> Observation {
        Observation {
            evaluation_id: date.to_string(),
            subject_id: None,
            timestamp: date.and_hms_opt(12, 0, 0).unwrap(),
            aptitude_code: "R".into(),
            aptitude_name: None,
            percentile: 50.0,
            direct_score: 5.0,
            attributes: SubjectAttributes::default(),
        }
    }

    #[test]
    fn test_trailing_monthly_window() {
        let window = TimeWindow::trailing(Period::Monthly, 3, d(2024, 5, 17)).unwrap();
        assert_eq!(window.start, d(2024, 3, 1));
        assert_eq!(window.end, d(2024, 5, 31));
    }

    #[test]
    fn test_filter_defaults_to_latest_observation() {
        let data = vec![obs(d(2023, 12, 31)), obs(d(2024, 1, 2)), obs(d(2024, 2, 20))];
        let (window, kept) = filter_time_range(&data, Period::Monthly, 2, None).unwrap();
        assert_eq!(window.unwrap().start, d(2024, 1, 1));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_explicit_reference_excludes_future() {
        let data = vec![obs(d(2024, 1, 2)), obs(d(2024, 3, 2))];
        let (_, kept) = filter_time_range(&data, Period::Quarterly, 1, Some(d(2024, 2, 1))).unwrap();
        assert_eq!(kept.len(), 2);
        let (_, kept) = filter_time_range(&data, Period::Monthly, 1, Some(d(2024, 2, 1))).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_empty_input_has_no_window() {
        let (window, kept) = filter_time_range(&[], Period::Daily, 5, None).unwrap();
        assert!(window.is_none());
        assert!(kept.is_empty());
    }
}
