//! Calendar periods used to bucket observations in time
//!
//! A period maps every date to the first day of the bucket containing it
//! (its *anchor*) and to a human readable key:
//!
//! | Period      | Anchor                     | Key          |
//! |-------------|----------------------------|--------------|
//! | `Daily`     | the date itself            | `2024-03-07` |
//! | `Weekly`    | Monday of the ISO week     | `2024-03-04` |
//! | `Monthly`   | first day of the month     | `2024-03`    |
//! | `Quarterly` | first day of the quarter   | `2024-Q1`    |

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Aggregation period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
        }
    }

    /// First day of the bucket containing `date`
    pub fn anchor(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Daily => date,
            Period::Weekly => {
                let offset = date.weekday().num_days_from_monday() as u64;
                date - Days::new(offset)
            }
            Period::Monthly => date.with_day(1).unwrap_or(date),
            Period::Quarterly => {
                let first_month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
            }
        }
    }

    /// Key of the bucket containing `date`
    pub fn key(&self, date: NaiveDate) -> String {
        let anchor = self.anchor(date);
        match self {
            Period::Daily | Period::Weekly => anchor.format("%Y-%m-%d").to_string(),
            Period::Monthly => anchor.format("%Y-%m").to_string(),
            Period::Quarterly => format!("{}-Q{}", anchor.year(), anchor.month0() / 3 + 1),
        }
    }

    /// Move `date` by `steps` whole periods (negative steps go back in time)
    pub fn advance(&self, date: NaiveDate, steps: i64) -> Result<NaiveDate> {
        let magnitude = steps.unsigned_abs();
        let forward = steps >= 0;
        let shifted = match self {
            Period::Daily => shift_days(date, magnitude, forward),
            Period::Weekly => magnitude
                .checked_mul(7)
                .and_then(|days| shift_days(date, days, forward)),
            Period::Monthly => u32::try_from(magnitude)
                .ok()
                .and_then(|m| shift_months(date, m, forward)),
            Period::Quarterly => u32::try_from(magnitude)
                .ok()
                .and_then(|m| m.checked_mul(3))
                .and_then(|m| shift_months(date, m, forward)),
        };
        shifted.ok_or_else(|| {
            Error::Computation(format!(
                "date {date} cannot be moved by {steps} {} periods",
                self.as_str()
            ))
        })
    }
}

fn shift_days(date: NaiveDate, days: u64, forward: bool) -> Option<NaiveDate> {
    if forward {
        date.checked_add_days(Days::new(days))
    } else {
        date.checked_sub_days(Days::new(days))
    }
}

fn shift_months(date: NaiveDate, months: u32, forward: bool) -> Option<NaiveDate> {
    if forward {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "quarterly" => Ok(Period::Quarterly),
            other => Err(Error::validation(
                "period",
                other,
                "expected one of daily, weekly, monthly, quarterly",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_keys() {
        let date = d(2024, 3, 7); // Thursday
        assert_eq!(Period::Daily.key(date), "2024-03-07");
        assert_eq!(Period::Weekly.key(date), "2024-03-04");
        assert_eq!(Period::Monthly.key(date), "2024-03");
        assert_eq!(Period::Quarterly.key(date), "2024-Q1");
        assert_eq!(Period::Quarterly.key(d(2024, 12, 31)), "2024-Q4");
    }

    #[test]
    fn test_weekly_anchor_crosses_year_boundary() {
        // 2025-01-01 is a Wednesday; its ISO week starts on 2024-12-30
        assert_eq!(Period::Weekly.anchor(d(2025, 1, 1)), d(2024, 12, 30));
        // Sunday belongs to the week started the previous Monday
        assert_eq!(Period::Weekly.anchor(d(2024, 3, 10)), d(2024, 3, 4));
    }

    #[test]
    fn test_advance() {
        let date = d(2024, 1, 31);
        assert_eq!(Period::Daily.advance(date, 1).unwrap(), d(2024, 2, 1));
        assert_eq!(Period::Weekly.advance(date, 2).unwrap(), d(2024, 2, 14));
        // Month arithmetic clamps to the last valid day
        assert_eq!(Period::Monthly.advance(date, 1).unwrap(), d(2024, 2, 29));
        assert_eq!(Period::Quarterly.advance(d(2024, 1, 1), 1).unwrap(), d(2024, 4, 1));
        assert_eq!(Period::Monthly.advance(d(2024, 3, 1), -3).unwrap(), d(2023, 12, 1));
    }

    #[test]
    fn test_parse() {
        assert_eq!("weekly".parse::<Period>().unwrap(), Period::Weekly);
        let err = "yearly".parse::<Period>().unwrap_err();
        assert!(err.is_validation());
    }
}
