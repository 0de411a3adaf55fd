//! Aptitude catalogue and percentile interpretation bands of the battery

use serde::{Deserialize, Serialize};
use std::fmt;

const CATALOGUE: &[(&str, &str)] = &[
    ("V", "Aptitud Verbal"),
    ("E", "Aptitud Espacial"),
    ("A", "Atención"),
    ("CON", "Concentración"),
    ("R", "Razonamiento"),
    ("N", "Aptitud Numérica"),
    ("M", "Aptitud Mecánica"),
    ("O", "Ortografía"),
];

/// Display name for an aptitude code; unknown codes are returned verbatim
pub fn display_name(code: &str) -> &str {
    CATALOGUE
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Interpretation band of a percentile score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileLevel {
    MuyBajo,
    Bajo,
    MedioBajo,
    Medio,
    MedioAlto,
    Alto,
    MuyAlto,
}

impl PercentileLevel {
    /// All levels from lowest to highest
    pub const ALL: [PercentileLevel; 7] = [
        PercentileLevel::MuyBajo,
        PercentileLevel::Bajo,
        PercentileLevel::MedioBajo,
        PercentileLevel::Medio,
        PercentileLevel::MedioAlto,
        PercentileLevel::Alto,
        PercentileLevel::MuyAlto,
    ];

    /// Classify a percentile (0-100)
    pub fn from_percentile(pc: f64) -> Self {
        match pc {
            p if p >= 95.0 => PercentileLevel::MuyAlto,
            p if p >= 81.0 => PercentileLevel::Alto,
            p if p >= 61.0 => PercentileLevel::MedioAlto,
            p if p >= 41.0 => PercentileLevel::Medio,
            p if p >= 21.0 => PercentileLevel::MedioBajo,
            p if p > 5.0 => PercentileLevel::Bajo,
            _ => PercentileLevel::MuyBajo,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PercentileLevel::MuyBajo => "Muy bajo",
            PercentileLevel::Bajo => "Bajo",
            PercentileLevel::MedioBajo => "Medio-bajo",
            PercentileLevel::Medio => "Medio",
            PercentileLevel::MedioAlto => "Medio-alto",
            PercentileLevel::Alto => "Alto",
            PercentileLevel::MuyAlto => "Muy alto",
        }
    }
}

impl fmt::Display for PercentileLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lookup() {
        assert_eq!(display_name("V"), "Aptitud Verbal");
        assert_eq!(display_name("con"), "Concentración");
        assert_eq!(display_name("XYZ"), "XYZ");
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(PercentileLevel::from_percentile(0.0), PercentileLevel::MuyBajo);
        assert_eq!(PercentileLevel::from_percentile(5.0), PercentileLevel::MuyBajo);
        assert_eq!(PercentileLevel::from_percentile(6.0), PercentileLevel::Bajo);
        assert_eq!(PercentileLevel::from_percentile(20.0), PercentileLevel::Bajo);
        assert_eq!(PercentileLevel::from_percentile(21.0), PercentileLevel::MedioBajo);
        assert_eq!(PercentileLevel::from_percentile(50.0), PercentileLevel::Medio);
        assert_eq!(PercentileLevel::from_percentile(61.0), PercentileLevel::MedioAlto);
        assert_eq!(PercentileLevel::from_percentile(94.0), PercentileLevel::Alto);
        assert_eq!(PercentileLevel::from_percentile(95.0), PercentileLevel::MuyAlto);
        assert_eq!(PercentileLevel::from_percentile(100.0), PercentileLevel::MuyAlto);
    }
}
