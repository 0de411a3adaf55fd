//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use psy_analytics::{Observation, RawObservation};
use psy_core::SubjectAttributes;

pub use approx::assert_relative_eq;

/// Route engine logs to the test output; `RUST_LOG` selects the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn observation(
    evaluation: &str,
    code: &str,
    date: NaiveDate,
    percentile: f64,
    gender: Option<&str>,
) -> Observation {
    Observation {
        evaluation_id: evaluation.to_string(),
        subject_id: Some(format!("subject-{evaluation}")),
        timestamp: date.and_hms_opt(9, 30, 0).unwrap(),
        aptitude_code: code.to_string(),
        aptitude_name: None,
        percentile,
        direct_score: percentile / 2.0,
        attributes: SubjectAttributes {
            gender: gender.map(str::to_string),
            ..SubjectAttributes::default()
        },
    }
}

/// Twelve months of 2024, four evaluations a month, three aptitudes each
///
/// Monthly means: V rises by 2 points a month from 50, N stays at 40 and
/// R falls from 70 to 40 in July. Even evaluations are "F", odd ones "M".
pub fn battery_history() -> Vec<Observation> {
    let mut data = Vec::new();
    for month in 0..12u32 {
        for eval in 0..4u32 {
            let date = NaiveDate::from_ymd_opt(2024, month + 1, 5 + eval).unwrap();
            let id = format!("ev-{month}-{eval}");
            let offset = eval as f64 - 1.5;
            let gender = if eval % 2 == 0 { "F" } else { "M" };
            let r_level = if month < 6 { 70.0 } else { 40.0 };
            data.push(observation(&id, "V", date, 50.0 + 2.0 * month as f64 + offset, Some(gender)));
            data.push(observation(&id, "N", date, 40.0 + 4.0 * offset, Some(gender)));
            data.push(observation(&id, "R", date, r_level + 2.0 * offset, Some(gender)));
        }
    }
    data
}

/// The same history as repository records
pub fn raw_history() -> Vec<RawObservation> {
    battery_history()
        .into_iter()
        .map(|obs| RawObservation {
            evaluation_id: Some(obs.evaluation_id),
            subject_id: obs.subject_id,
            timestamp: Some(obs.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            aptitude_code: Some(obs.aptitude_code),
            aptitude_name: obs.aptitude_name,
            percentile: Some(obs.percentile),
            direct_score: Some(obs.direct_score),
            gender: obs.attributes.gender,
            ..RawObservation::default()
        })
        .collect()
}
