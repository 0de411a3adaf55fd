//! Time-series aggregation of psychometric results
//!
//! Observations are bucketed into calendar periods (see [`psy_core::Period`])
//! and each bucket is summarised into a [`TimeSeriesPoint`]. The
//! [`TimeSeriesAggregator`] produces the overall, per-aptitude and per-group
//! series in a single scan of the input.

pub mod aggregator;
pub mod point;
pub mod window;

pub use aggregator::{AggregatedSeries, AptitudeSeries, TimeSeriesAggregator};
pub use point::{means, TimeSeriesPoint};
pub use window::{filter_time_range, TimeWindow};
