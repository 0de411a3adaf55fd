//! Trend analysis over period series
//!
//! This crate turns the [`TimeSeriesPoint`](psy_timeseries::TimeSeriesPoint)
//! series built by `psy-timeseries` into interpretable signals.
//!
//! # Components
//!
//! ## Trend strategies
//! - **Linear**: OLS slope with direction and significance classes
//! - **Seasonal**: calendar-month averages with peak/valley months
//!
//! Strategies implement [`TrendStrategy`] and are selected by [`TrendKind`]
//! through [`TrendModel::from_kind`].
//!
//! ## Change points
//! [`ChangePointDetector`] compares the means of adjacent windows and reports
//! shifts larger than a threshold.
//!
//! ## Forecasts
//! [`ForecastEngine`] extrapolates the OLS line with a fixed-width band,
//! clamped to the percentile scale.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use psy_timeseries::TimeSeriesPoint;
//! use psy_trend::{TrendDirection, TrendKind, TrendModel, TrendParameters, TrendStrategy};
//!
//! let series: Vec<TimeSeriesPoint> = [40.0, 43.0, 46.0, 49.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &v)| {
//!         let date = NaiveDate::from_ymd_opt(2024, 1 + i as u32, 1).unwrap();
//!         TimeSeriesPoint::with_value(format!("2024-{:02}", i + 1), date, v)
//!     })
//!     .collect();
//!
//! let model = TrendModel::from_kind(TrendKind::Linear, &TrendParameters::default());
//! let outcome = model.analyze(&series);
//! assert_eq!(outcome.as_linear().unwrap().direction, TrendDirection::Ascending);
//! ```

pub mod changepoint;
pub mod forecast;
pub mod linear;
pub mod regression;
pub mod seasonal;
pub mod strategy;
pub mod traits;
pub mod types;

pub use changepoint::{ChangePointDetector, ChangePointParameters};
pub use forecast::{ForecastEngine, ForecastParameters};
pub use linear::{LinearTrend, LinearTrendParameters};
pub use regression::{fit_linear, LinearFit};
pub use seasonal::{SeasonalParameters, SeasonalTrend};
pub use strategy::{TrendKind, TrendModel, TrendParameters};
pub use traits::{TrendOutcome, TrendStrategy, TrendStrategyProperties};
pub use types::{
    ChangePoint, ChangePointSet, ChangeType, ConfidenceInterval, Forecast, ForecastSet,
    MonthValue, SeasonalPattern, TrendDirection, TrendResult, TrendSignificance,
};
