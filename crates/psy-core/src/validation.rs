//! Input validation and failure isolation
//!
//! [`ValidationGuard`] rejects malformed configuration and records before any
//! computation runs. [`safe_execute`] wraps a fallible sub-analysis so that a
//! failure (or panic) yields a documented fallback instead of aborting the
//! whole report.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, MAX_FORECAST_PERIODS, MAX_TIME_RANGE, MIN_TIME_RANGE};
use crate::error::{Error, Result};
use crate::observation::{Observation, RawObservation, SubjectAttributes};
use crate::status::Section;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Stateless validator for configuration and observations
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationGuard;

impl ValidationGuard {
    pub fn new() -> Self {
        Self
    }

    /// Validate a request configuration
    pub fn validate_config(&self, config: &AnalysisConfig) -> Result<()> {
        if !(MIN_TIME_RANGE..=MAX_TIME_RANGE).contains(&config.time_range_in_periods) {
            return Err(Error::validation(
                "timeRangeInPeriods",
                config.time_range_in_periods,
                format!("must be within [{MIN_TIME_RANGE}, {MAX_TIME_RANGE}]"),
            ));
        }
        if config.include_forecasting
            && !(1..=MAX_FORECAST_PERIODS).contains(&config.forecast_periods)
        {
            return Err(Error::validation(
                "forecastPeriods",
                config.forecast_periods,
                format!("must be within [1, {MAX_FORECAST_PERIODS}] when forecasting"),
            ));
        }
        Ok(())
    }

    /// Check an already typed observation
    pub fn check_observation(&self, obs: &Observation) -> Result<()> {
        if obs.evaluation_id.trim().is_empty() {
            return Err(Error::missing_field("evaluationId"));
        }
        if obs.aptitude_code.trim().is_empty() {
            return Err(Error::missing_field("aptitudeCode"));
        }
        check_percentile(obs.percentile)?;
        check_direct_score(obs.direct_score)
    }

    /// Check every typed observation, reporting the first offending record
    pub fn check_observations(&self, observations: &[Observation]) -> Result<()> {
        for (index, obs) in observations.iter().enumerate() {
            self.check_observation(obs)
                .map_err(|e| prefix_field(e, index))?;
        }
        Ok(())
    }

    /// Convert a repository record into an [`Observation`]
    pub fn validate_observation(&self, raw: &RawObservation) -> Result<Observation> {
        let evaluation_id = required_text(&raw.evaluation_id, "evaluationId")?;
        let aptitude_code = required_text(&raw.aptitude_code, "aptitudeCode")?;
        let timestamp_text = required_text(&raw.timestamp, "timestamp")?;
        let timestamp = parse_timestamp(&timestamp_text)?;
        let percentile = raw
            .percentile
            .ok_or_else(|| Error::missing_field("percentile"))?;
        check_percentile(percentile)?;
        let direct_score = raw
            .direct_score
            .ok_or_else(|| Error::missing_field("directScore"))?;
        check_direct_score(direct_score)?;

        Ok(Observation {
            evaluation_id,
            subject_id: raw.subject_id.clone(),
            timestamp,
            aptitude_code,
            aptitude_name: raw.aptitude_name.clone(),
            percentile,
            direct_score,
            attributes: SubjectAttributes {
                gender: raw.gender.clone(),
                age_group: raw.age_group.clone(),
                education_level: raw.education_level.clone(),
                institution: raw.institution.clone(),
            },
        })
    }

    /// Convert a batch of repository records; the first invalid record fails the batch
    pub fn validate_observations(&self, raws: &[RawObservation]) -> Result<Vec<Observation>> {
        let observations = raws
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                self.validate_observation(raw)
                    .map_err(|e| prefix_field(e, index))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(count = observations.len(), "validated observations");
        Ok(observations)
    }
}

/// Parse the timestamp formats emitted by the result store
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS` and
/// bare `YYYY-MM-DD` dates (taken at midnight).
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::validation("timestamp", text, "unparseable date"))
}

/// Run `operation`, substituting `fallback()` if it fails or panics
///
/// Validation errors and cancellation are never absorbed: they are returned
/// to the caller unchanged.
pub fn safe_execute<T, F, D>(label: &str, operation: F, fallback: D) -> Result<Section<T>>
where
    F: FnOnce() -> Result<T>,
    D: FnOnce() -> T,
{
    match panic::catch_unwind(AssertUnwindSafe(operation)) {
        Ok(Ok(value)) => Ok(Section::complete(value)),
        Ok(Err(err)) if err.is_validation() || matches!(err, Error::Cancelled) => Err(err),
        Ok(Err(err)) => {
            warn!(operation = label, error = %err, "operation failed, using fallback");
            Ok(Section::fallback(fallback(), err.to_string()))
        }
        Err(payload) => {
            let reason = format!("internal failure: {}", panic_message(payload.as_ref()));
            warn!(operation = label, %reason, "operation panicked, using fallback");
            Ok(Section::fallback(fallback(), reason))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn required_text(value: &Option<String>, field: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(Error::missing_field(field)),
    }
}

fn check_percentile(percentile: f64) -> Result<()> {
    if !percentile.is_finite() || !(0.0..=100.0).contains(&percentile) {
        return Err(Error::validation(
            "percentile",
            percentile,
            "must be a finite value within [0, 100]",
        ));
    }
    Ok(())
}

fn check_direct_score(score: f64) -> Result<()> {
    if !score.is_finite() || score < 0.0 {
        return Err(Error::validation(
            "directScore",
            score,
            "must be a finite, non-negative value",
        ));
    }
    Ok(())
}

fn prefix_field(err: Error, index: usize) -> Error {
    match err {
        Error::Validation {
            field,
            value,
            reason,
        } => Error::Validation {
            field: format!("records[{index}].{field}"),
            value,
            reason,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SectionStatus;
    use chrono::Timelike;

    fn raw() -> RawObservation {
        RawObservation {
            evaluation_id: Some("ev-1".into()),
            timestamp: Some("2024-05-10T09:30:00Z".into()),
            aptitude_code: Some("N".into()),
            percentile: Some(64.0),
            direct_score: Some(18.0),
            gender: Some("M".into()),
            ..RawObservation::default()
        }
    }

    #[test]
    fn test_valid_record() {
        let obs = ValidationGuard::new().validate_observation(&raw()).unwrap();
        assert_eq!(obs.aptitude_code, "N");
        assert_eq!(obs.timestamp.hour(), 9);
        assert_eq!(obs.display_name(), "Aptitud Numérica");
        assert_eq!(obs.attributes.gender.as_deref(), Some("M"));
    }

    #[test]
    fn test_percentile_out_of_range() {
        let mut record = raw();
        record.percentile = Some(101.0);
        let err = ValidationGuard::new().validate_observation(&record).unwrap_err();
        match err {
            Error::Validation { field, value, .. } => {
                assert_eq!(field, "percentile");
                assert_eq!(value, "101");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_unparseable_fields() {
        let guard = ValidationGuard::new();

        let mut record = raw();
        record.aptitude_code = Some("  ".into());
        assert!(matches!(
            guard.validate_observation(&record),
            Err(Error::Validation { ref field, .. }) if field == "aptitudeCode"
        ));

        let mut record = raw();
        record.timestamp = Some("10/05/2024".into());
        assert!(matches!(
            guard.validate_observation(&record),
            Err(Error::Validation { ref field, .. }) if field == "timestamp"
        ));
    }

    #[test]
    fn test_batch_error_names_record() {
        let mut bad = raw();
        bad.direct_score = None;
        let err = ValidationGuard::new()
            .validate_observations(&[raw(), bad])
            .unwrap_err();
        assert!(err.to_string().contains("records[1].directScore"));
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2024-01-02").is_ok());
        assert!(parse_timestamp("2024-01-02 10:11:12").is_ok());
        assert!(parse_timestamp("2024-01-02T10:11:12.250").is_ok());
        assert!(parse_timestamp("2024-01-02T10:11:12+02:00").is_ok());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_config_bounds() {
        let guard = ValidationGuard::new();
        assert!(guard.validate_config(&AnalysisConfig::default()).is_ok());
        assert!(guard
            .validate_config(&AnalysisConfig::default().with_time_range(0))
            .is_err());
        assert!(guard
            .validate_config(&AnalysisConfig::default().with_time_range(121))
            .is_err());
        assert!(guard
            .validate_config(&AnalysisConfig::default().with_forecasting(0))
            .is_err());
    }

    #[test]
    fn test_safe_execute_fallbacks() {
        let ok = safe_execute("ok", || Ok(3), || 0).unwrap();
        assert_eq!(ok.data, 3);
        assert_eq!(ok.status, SectionStatus::Complete);

        let failed = safe_execute(
            "repository",
            || Err::<Vec<u8>, _>(Error::Repository("timeout".into())),
            Vec::new,
        )
        .unwrap();
        assert!(failed.is_fallback());
        assert!(failed.data.is_empty());

        let panicked = safe_execute::<u32, _, _>("panics", || panic!("boom"), || 7).unwrap();
        assert_eq!(panicked.data, 7);
        match panicked.status {
            SectionStatus::Fallback { reason } => assert!(reason.contains("boom")),
            SectionStatus::Complete => panic!("expected fallback"),
        }
    }

    #[test]
    fn test_safe_execute_propagates_validation_and_cancellation() {
        let err = safe_execute::<u8, _, _>(
            "config",
            || Err(Error::validation("period", "x", "bad")),
            || 0,
        )
        .unwrap_err();
        assert!(err.is_validation());

        let err = safe_execute::<u8, _, _>("cancel", || Err(Error::Cancelled), || 0).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
