//! Relative Arrival Labels

use crate::{FailureReason, RecordFailure};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use waveform::{LabeledRecord, SignalSource};

/// Arrival time relative to its recording's start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeLabel {
    /// Record identifier
    pub file: String,
    /// Seconds from the first sample
    pub arrival_time: f64,
}

/// Labels that could be resolved, plus the records that could not
#[derive(Debug, Clone, Default)]
pub struct LabelResolution {
    pub labels: Vec<RelativeLabel>,
    pub failures: Vec<RecordFailure>,
}

/// Converts a label table to arrival times relative to each recording
pub struct LabelResolver<'a> {
    source: &'a dyn SignalSource,
}

impl<'a> LabelResolver<'a> {
    /// Create a resolver reading start times from `source`
    pub fn new(source: &'a dyn SignalSource) -> Self {
        Self { source }
    }

    /// Resolve every record, in order
    ///
    /// Each signal is read for its start time even when the label is already
    /// relative, so the output only lists readable recordings.
    pub fn resolve(&self, records: &[LabeledRecord]) -> LabelResolution {
        let mut resolution = LabelResolution::default();

        for record in records {
            match self.source.read(&record.identifier) {
                Ok(signal) => resolution.labels.push(RelativeLabel {
                    file: record.identifier.clone(),
                    arrival_time: record.arrival.relative_to(&signal),
                }),
                Err(e) => {
                    let reason = FailureReason::from(e);
                    warn!("Skipping label for {}: {}", record.identifier, reason);
                    resolution
                        .failures
                        .push(RecordFailure::new(&record.identifier, &reason));
                }
            }
        }

        info!(
            "Resolved {} of {} arrival labels",
            resolution.labels.len(),
            records.len()
        );
        resolution
    }
}
