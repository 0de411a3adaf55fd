//! Test-result records consumed by the analytics engine

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::aptitude;
use crate::error::Error;

/// Demographic attributes of the evaluated subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAttributes {
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub education_level: Option<String>,
    pub institution: Option<String>,
}

impl SubjectAttributes {
    /// Value of the attribute selected by `dimension`
    pub fn get(&self, dimension: GroupBy) -> Option<&str> {
        let value = match dimension {
            GroupBy::Gender => &self.gender,
            GroupBy::AgeGroup => &self.age_group,
            GroupBy::EducationLevel => &self.education_level,
            GroupBy::Institution => &self.institution,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Demographic dimension used to partition observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    Gender,
    AgeGroup,
    EducationLevel,
    Institution,
}

impl GroupBy {
    /// All supported dimensions, in report order
    pub const ALL: [GroupBy; 4] = [
        GroupBy::Gender,
        GroupBy::AgeGroup,
        GroupBy::EducationLevel,
        GroupBy::Institution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Gender => "gender",
            GroupBy::AgeGroup => "ageGroup",
            GroupBy::EducationLevel => "educationLevel",
            GroupBy::Institution => "institution",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gender" => Ok(GroupBy::Gender),
            "ageGroup" | "age_group" => Ok(GroupBy::AgeGroup),
            "educationLevel" | "education_level" => Ok(GroupBy::EducationLevel),
            "institution" => Ok(GroupBy::Institution),
            other => Err(Error::validation(
                "groupBy",
                other,
                "expected one of gender, ageGroup, educationLevel, institution",
            )),
        }
    }
}

/// One validated test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Identifier of the evaluation session the result belongs to
    pub evaluation_id: String,
    pub subject_id: Option<String>,
    pub timestamp: NaiveDateTime,
    pub aptitude_code: String,
    pub aptitude_name: Option<String>,
    /// Percentile rank (PC), 0 to 100
    pub percentile: f64,
    /// Raw score (PD)
    pub direct_score: f64,
    #[serde(default)]
    pub attributes: SubjectAttributes,
}

impl Observation {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Display name of the aptitude, falling back to the battery catalogue
    pub fn display_name(&self) -> &str {
        match &self.aptitude_name {
            Some(name) if !name.trim().is_empty() => name,
            _ => aptitude::display_name(&self.aptitude_code),
        }
    }
}

/// A record as delivered by the result repository, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservation {
    pub evaluation_id: Option<String>,
    pub subject_id: Option<String>,
    pub timestamp: Option<String>,
    pub aptitude_code: Option<String>,
    pub aptitude_name: Option<String>,
    pub percentile: Option<f64>,
    pub direct_score: Option<f64>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub education_level: Option<String>,
    pub institution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_round_trip_names() {
        for dim in GroupBy::ALL {
            assert_eq!(dim.as_str().parse::<GroupBy>().unwrap(), dim);
        }
        assert!("zodiac".parse::<GroupBy>().is_err());
    }

    #[test]
    fn test_attribute_lookup_ignores_blank_values() {
        let attrs = SubjectAttributes {
            gender: Some("F".into()),
            age_group: Some("   ".into()),
            education_level: None,
            institution: Some(" IES Norte ".into()),
        };
        assert_eq!(attrs.get(GroupBy::Gender), Some("F"));
        assert_eq!(attrs.get(GroupBy::AgeGroup), None);
        assert_eq!(attrs.get(GroupBy::EducationLevel), None);
        assert_eq!(attrs.get(GroupBy::Institution), Some("IES Norte"));
    }

    #[test]
    fn test_raw_observation_deserializes_camel_case() {
        let raw: RawObservation = serde_json::from_str(
            r#"{"evaluationId":"ev-1","timestamp":"2024-03-01","aptitudeCode":"V","percentile":55,"directScore":21,"ageGroup":"12-14"}"#,
        )
        .unwrap();
        assert_eq!(raw.evaluation_id.as_deref(), Some("ev-1"));
        assert_eq!(raw.percentile, Some(55.0));
        assert_eq!(raw.age_group.as_deref(), Some("12-14"));
        assert!(raw.gender.is_none());
    }

    #[test]
    fn test_observation_serializes_camel_case() {
        let obs = Observation {
            evaluation_id: "ev-9".into(),
            subject_id: None,
            timestamp: NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            aptitude_code: "E".into(),
            aptitude_name: None,
            percentile: 61.0,
            direct_score: 30.0,
            attributes: SubjectAttributes {
                age_group: Some("15-17".into()),
                ..SubjectAttributes::default()
            },
        };
        let value = serde_json::to_value(&obs).unwrap();
        assert_eq!(value["evaluationId"], "ev-9");
        assert_eq!(value["directScore"], 30.0);
        assert_eq!(value["attributes"]["ageGroup"], "15-17");
        assert!(value.get("direct_score").is_none());

        let back: Observation = serde_json::from_value(value).unwrap();
        assert_eq!(back, obs);
    }
}
