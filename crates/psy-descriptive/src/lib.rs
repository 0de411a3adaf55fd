//! Descriptive statistics for psychometric scores
//!
//! This crate provides the statistics every report section is built on:
//!
//! - [`DescriptiveStatistics`]: central tendency, dispersion, shape and
//!   quartiles of a sample, with a documented all-zero result for empty input
//! - [`OutlierDetector`]: Tukey IQR fences
//! - [`LevelDistribution`]: counts per percentile interpretation band
//!
//! # Example
//!
//! ```rust
//! use psy_descriptive::{describe, OutlierDetector};
//!
//! let stats = describe(&[10.0, 20.0, 30.0, 40.0, 50.0]);
//! assert_eq!(stats.mean, 30.0);
//! assert_eq!(stats.iqr, 20.0);
//!
//! let report = OutlierDetector::new().detect(&[50.0, 51.0, 49.0, 52.0, 98.0]);
//! assert_eq!(report.count(), 1);
//! ```

pub mod descriptive;
pub mod levels;
pub mod outliers;
pub mod quantile;

pub use descriptive::{describe, DescriptiveStatistics, DescriptiveStats};
pub use levels::LevelDistribution;
pub use outliers::{Outlier, OutlierDetector, OutlierDirection, OutlierParameters, OutlierReport};
pub use quantile::{percentile, quantile_sorted};
