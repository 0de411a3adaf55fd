//! Status markers carried by partially computable results

use serde::{Deserialize, Serialize};

/// Whether a component had enough data to produce a full result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStatus {
    #[default]
    Complete,
    InsufficientData,
}

impl DataStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, DataStatus::Complete)
    }
}

/// How a report section was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SectionStatus {
    /// Computed normally
    Complete,
    /// The computation failed and a documented fallback was substituted
    Fallback { reason: String },
}

/// A report section together with the way it was obtained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section<T> {
    pub status: SectionStatus,
    pub data: T,
}

impl<T> Section<T> {
    pub fn complete(data: T) -> Self {
        Self {
            status: SectionStatus::Complete,
            data,
        }
    }

    pub fn fallback(data: T, reason: impl Into<String>) -> Self {
        Self {
            status: SectionStatus::Fallback {
                reason: reason.into(),
            },
            data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.status, SectionStatus::Fallback { .. })
    }

    /// Apply `f` to the payload, keeping the status
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        Section {
            status: self.status,
            data: f(self.data),
        }
    }
}
