//! Core types and guards for psychometric battery analytics
//!
//! This crate provides the foundation shared by every analytics crate:
//!
//! - **Data model**: [`Observation`] (validated test result) and
//!   [`RawObservation`] (record as delivered by the result repository)
//! - **Calendar periods**: [`Period`] bucketing and date arithmetic
//! - **Validation**: [`ValidationGuard`] and the [`safe_execute`] fallback policy
//! - **Errors**: a unified [`Error`] type and [`Result`] alias
//! - **Cancellation**: a cooperative [`CancellationToken`]
//!
//! # Example
//!
//! ```rust
//! use psy_core::{RawObservation, ValidationGuard};
//!
//! let raw = RawObservation {
//!     evaluation_id: Some("ev-1".into()),
//!     timestamp: Some("2024-03-01".into()),
//!     aptitude_code: Some("V".into()),
//!     percentile: Some(72.0),
//!     direct_score: Some(31.0),
//!     ..RawObservation::default()
//! };
//!
//! let obs = ValidationGuard::new().validate_observation(&raw).unwrap();
//! assert_eq!(obs.display_name(), "Aptitud Verbal");
//! ```

pub mod aptitude;
pub mod cancel;
pub mod config;
pub mod error;
pub mod numeric;
pub mod observation;
pub mod period;
pub mod status;
pub mod validation;

pub use aptitude::PercentileLevel;
pub use cancel::CancellationToken;
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use observation::{GroupBy, Observation, RawObservation, SubjectAttributes};
pub use period::Period;
pub use status::{DataStatus, Section, SectionStatus};
pub use validation::{parse_timestamp, safe_execute, ValidationGuard};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
