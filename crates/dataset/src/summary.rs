//! Build Summary

use crate::FailureReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Category of a skipped record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SignalRead,
    EmptySignal,
    InvalidSignal,
    FeatureLengthMismatch,
    NonFiniteFeature,
    Extraction,
}

impl FailureKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::SignalRead => "signal_read",
            FailureKind::EmptySignal => "empty_signal",
            FailureKind::InvalidSignal => "invalid_signal",
            FailureKind::FeatureLengthMismatch => "feature_length_mismatch",
            FailureKind::NonFiniteFeature => "non_finite_feature",
            FailureKind::Extraction => "extraction",
        }
    }
}

/// One skipped record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    /// Record identifier
    pub identifier: String,
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable cause
    pub message: String,
}

impl RecordFailure {
    /// Capture a failure reason for `identifier`
    pub fn new(identifier: impl Into<String>, reason: &FailureReason) -> Self {
        Self {
            identifier: identifier.into(),
            kind: reason.kind(),
            message: reason.to_string(),
        }
    }
}

/// Outcome counts of a dataset build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSummary {
    /// Unique id of this build run
    pub run_id: Uuid,
    /// When the build started
    pub started_at: DateTime<Utc>,
    /// When the build finished
    pub finished_at: Option<DateTime<Utc>>,
    /// Analyzing wavelet
    pub basis: String,
    /// Decomposition depth
    pub levels: usize,
    /// Records attempted
    pub attempted: usize,
    /// Records that produced a dataset row
    pub succeeded: usize,
    /// Skipped records per cause
    pub skipped: BTreeMap<FailureKind, usize>,
    /// Every skipped record, in input order
    pub failures: Vec<RecordFailure>,
}

impl BuildSummary {
    /// Start a summary for a new run
    pub fn new(basis: impl Into<String>, levels: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            basis: basis.into(),
            levels,
            attempted: 0,
            succeeded: 0,
            skipped: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    /// Count a record that produced a row
    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    /// Count a skipped record
    pub fn record_failure(&mut self, identifier: &str, reason: &FailureReason) {
        self.attempted += 1;
        *self.skipped.entry(reason.kind()).or_insert(0) += 1;
        self.failures.push(RecordFailure::new(identifier, reason));
    }

    /// Stamp the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total skipped records
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    /// Skipped records of one cause
    pub fn skipped_by(&self, kind: FailureKind) -> usize {
        self.skipped.get(&kind).copied().unwrap_or(0)
    }

    /// True when no record produced a row
    pub fn no_usable_data(&self) -> bool {
        self.succeeded == 0
    }

    /// Identifiers of skipped records
    pub fn skipped_identifiers(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.identifier.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveform::SignalReadError;

    #[test]
    fn test_counts_by_cause() {
        let mut summary = BuildSummary::new("db4", 4);
        summary.record_success();
        summary.record_failure("a", &FailureReason::EmptySignal);
        summary.record_failure(
            "b",
            &FailureReason::SignalRead(SignalReadError::NotFound("b".into())),
        );
        summary.record_failure("c", &FailureReason::EmptySignal);

        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped_total(), 3);
        assert_eq!(summary.skipped_by(FailureKind::EmptySignal), 2);
        assert_eq!(summary.skipped_by(FailureKind::SignalRead), 1);
        assert_eq!(summary.skipped_by(FailureKind::InvalidSignal), 0);
        assert_eq!(summary.skipped_identifiers(), vec!["a", "b", "c"]);
        assert!(!summary.no_usable_data());
    }

    #[test]
    fn test_summary_serializes_cause_keys() {
        let mut summary = BuildSummary::new("haar", 2);
        summary.record_failure("a", &FailureReason::EmptySignal);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["skipped"]["empty_signal"], 1);
        assert_eq!(json["failures"][0]["kind"], "empty_signal");
    }
}
