//! Per-Record Validation Report

use crate::SignalValidator;
use serde::{Deserialize, Serialize};
use tracing::debug;
use waveform::{LabeledRecord, SignalSource};

/// Validation outcome for one labeled record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationEntry {
    #[serde(rename = "File ID")]
    pub file_id: String,
    #[serde(rename = "Is Valid")]
    pub is_valid: bool,
    #[serde(rename = "Signal Duration (s)")]
    pub duration_secs: Option<f64>,
    #[serde(rename = "P Arrival Time (s)")]
    pub relative_arrival_secs: Option<f64>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    /// Arrival falls inside the recording
    #[serde(rename = "Has P Arrival")]
    pub has_arrival: bool,
}

/// Validation outcomes for a label table, in input order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub entries: Vec<ValidationEntry>,
}

impl ValidationReport {
    /// Validate every record's signal and label
    ///
    /// A record is valid when its signal reads, passes the validator, and its
    /// arrival lies within `[0, duration]` of the recording.
    pub fn build(
        records: &[LabeledRecord],
        source: &dyn SignalSource,
        validator: &SignalValidator,
    ) -> Self {
        let entries = records
            .iter()
            .map(|record| Self::check(record, source, validator))
            .collect();
        Self { entries }
    }

    fn check(
        record: &LabeledRecord,
        source: &dyn SignalSource,
        validator: &SignalValidator,
    ) -> ValidationEntry {
        let signal = match source.read(&record.identifier) {
            Ok(signal) => signal,
            Err(e) => {
                return ValidationEntry {
                    file_id: record.identifier.clone(),
                    is_valid: false,
                    duration_secs: None,
                    relative_arrival_secs: None,
                    error: Some(e.to_string()),
                    has_arrival: false,
                };
            }
        };

        let duration = signal.duration_secs();
        let arrival = record.arrival.relative_to(&signal);
        let has_arrival = arrival.is_finite() && (0.0..=duration).contains(&arrival);

        let error = match validator.validate(&signal) {
            Err(e) => Some(e.to_string()),
            Ok(()) if !has_arrival => Some(format!(
                "Arrival at {arrival:.3}s lies outside the {duration:.3}s recording"
            )),
            Ok(()) => None,
        };

        debug!("Validated {}: {:?}", record.identifier, error);

        ValidationEntry {
            file_id: record.identifier.clone(),
            is_valid: error.is_none(),
            duration_secs: Some(duration),
            relative_arrival_secs: Some(arrival),
            error,
            has_arrival,
        }
    }

    /// Entries that failed validation
    pub fn invalid(&self) -> impl Iterator<Item = &ValidationEntry> {
        self.entries.iter().filter(|e| !e.is_valid)
    }

    /// Number of valid entries
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_valid).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use waveform::{MemorySignalSource, Signal};

    #[test]
    fn test_report_flags_each_failure() {
        let start = DateTime::from_timestamp(1_600_000_000, 0).unwrap();
        let source = MemorySignalSource::new()
            .with_signal("ok", Signal::new(vec![0.0; 1000], 100.0, start))
            .with_signal("nan", Signal::new(vec![f64::NAN; 10], 100.0, start));

        let records = vec![
            LabeledRecord::absolute("ok", start + Duration::seconds(4)),
            LabeledRecord::relative("ok", 12.0),
            LabeledRecord::relative("nan", 0.01),
            LabeledRecord::relative("gone", 1.0),
        ];

        let report = ValidationReport::build(&records, &source, &SignalValidator::default());
        assert_eq!(report.entries.len(), 4);
        assert_eq!(report.valid_count(), 1);

        let first = &report.entries[0];
        assert!(first.is_valid && first.has_arrival);
        assert_eq!(first.duration_secs, Some(10.0));
        assert_eq!(first.relative_arrival_secs, Some(4.0));

        assert!(!report.entries[1].has_arrival);
        assert!(report.entries[2].error.as_deref().unwrap().contains("Non-finite"));
        assert_eq!(report.entries[3].duration_secs, None);

        let invalid: Vec<&str> = report.invalid().map(|e| e.file_id.as_str()).collect();
        assert_eq!(invalid, vec!["ok", "nan", "gone"]);
    }
}
