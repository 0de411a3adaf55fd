//! Result repository collaborator

use psy_core::{AnalysisConfig, RawObservation, Result};

/// Supplies the raw result records for an analysis
///
/// Implementations wrap the host's data-access layer. Failures are reported
/// as [`psy_core::Error::Repository`]; the engine treats them as an empty
/// data set.
pub trait ObservationSource: Send + Sync {
    fn fetch(&self, config: &AnalysisConfig) -> Result<Vec<RawObservation>>;
}

/// A fixed set of records held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<RawObservation>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawObservation>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ObservationSource for InMemorySource {
    fn fetch(&self, _config: &AnalysisConfig) -> Result<Vec<RawObservation>> {
        Ok(self.records.clone())
    }
}

impl<F> ObservationSource for F
where
    F: Fn(&AnalysisConfig) -> Result<Vec<RawObservation>> + Send + Sync,
{
    fn fetch(&self, config: &AnalysisConfig) -> Result<Vec<RawObservation>> {
        self(config)
    }
}
