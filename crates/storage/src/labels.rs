//! Label Table CSV

use crate::StorageError;
use dataset::RelativeLabel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use waveform::{ArrivalTime, LabeledRecord};

/// How the time column of a label table is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBasis {
    /// Fractional Unix epoch seconds
    Absolute,
    /// Seconds from the recording start
    Relative,
}

/// Label table layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelTableConfig {
    /// Column holding the recording identifier
    pub id_column: String,
    /// Column holding the arrival time
    pub time_column: String,
    /// Meaning of the time column
    pub time_basis: TimeBasis,
    /// Zero-pad numeric identifiers to this width
    pub id_pad_width: Option<usize>,
    /// Extension appended to identifiers lacking it
    pub id_extension: Option<String>,
}

impl Default for LabelTableConfig {
    fn default() -> Self {
        Self {
            id_column: "file".to_string(),
            time_column: "arrival_time".to_string(),
            time_basis: TimeBasis::Relative,
            id_pad_width: None,
            id_extension: None,
        }
    }
}

impl LabelTableConfig {
    /// Layout of the raw catalogue: numeric ids and absolute P readings
    pub fn raw_catalogue() -> Self {
        Self {
            id_column: "archivo".to_string(),
            time_column: "lec_p".to_string(),
            time_basis: TimeBasis::Absolute,
            id_pad_width: Some(8),
            id_extension: Some(".mseed".to_string()),
        }
    }

    /// Turn a raw identifier cell into a source identifier
    ///
    /// With a pad width set, the cell must hold a non-negative integer
    /// (`42` or `42.0`).
    pub fn format_identifier(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut identifier = match self.id_pad_width {
            Some(width) => {
                let number = parse_whole_number(raw)?;
                format!("{number:0width$}")
            }
            None => raw.to_string(),
        };

        if let Some(ext) = &self.id_extension {
            if !identifier.ends_with(ext.as_str()) {
                identifier.push_str(ext);
            }
        }
        Some(identifier)
    }
}

fn parse_whole_number(raw: &str) -> Option<u64> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64)
        .then_some(value as u64)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, StorageError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| StorageError::MissingColumn(name.to_string()))
}

/// Read a label table into records, in file order
pub fn read_label_table(
    path: &Path,
    config: &LabelTableConfig,
) -> Result<Vec<LabeledRecord>, StorageError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let id_idx = column_index(&headers, &config.id_column)?;
    let time_idx = column_index(&headers, &config.time_column)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let row_no = i + 1;
        let invalid = |column: &str, value: &str| StorageError::InvalidValue {
            row: row_no,
            column: column.to_string(),
            value: value.to_string(),
        };

        let raw_id = row.get(id_idx).unwrap_or("");
        let identifier = config
            .format_identifier(raw_id)
            .ok_or_else(|| invalid(&config.id_column, raw_id))?;

        let raw_time = row.get(time_idx).unwrap_or("").trim();
        let secs: f64 = raw_time
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| invalid(&config.time_column, raw_time))?;

        let arrival = match config.time_basis {
            TimeBasis::Relative => ArrivalTime::Relative(secs),
            TimeBasis::Absolute => ArrivalTime::from_epoch_seconds(secs)
                .ok_or_else(|| invalid(&config.time_column, raw_time))?,
        };

        debug!("Label row {}: {} -> {:?}", row_no, identifier, arrival);
        records.push(LabeledRecord {
            identifier,
            arrival,
        });
    }

    info!("Loaded {} labeled records from {}", records.len(), path.display());
    Ok(records)
}

/// Write `file,arrival_time` rows
pub fn write_relative_labels(path: &Path, labels: &[RelativeLabel]) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    if labels.is_empty() {
        writer.write_record(["file", "arrival_time"])?;
    }
    for label in labels {
        writer.serialize(label)?;
    }
    writer.flush()?;
    info!("Wrote {} relative labels to {}", labels.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::fs;

    #[test]
    fn test_read_relative_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arrivals.csv");
        fs::write(&path, "file,arrival_time\na.mseed,1.5\nb.mseed,2.25\n").unwrap();

        let records = read_label_table(&path, &LabelTableConfig::default()).unwrap();
        assert_eq!(
            records,
            vec![
                LabeledRecord::relative("a.mseed", 1.5),
                LabeledRecord::relative("b.mseed", 2.25),
            ]
        );
    }

    #[test]
    fn test_read_raw_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("VT_P_training.csv");
        fs::write(&path, "archivo,lec_p,other\n42,1600000000.5,x\n7.0,1600000100,y\n").unwrap();

        let records = read_label_table(&path, &LabelTableConfig::raw_catalogue()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "00000042.mseed");
        assert_eq!(records[1].identifier, "00000007.mseed");
        assert_eq!(
            records[1].arrival,
            ArrivalTime::Absolute(DateTime::from_timestamp(1_600_000_100, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "augmented_file,arrival_time\na,1.0\n").unwrap();

        let err = read_label_table(&path, &LabelTableConfig::default()).unwrap_err();
        assert!(matches!(err, StorageError::MissingColumn(c) if c == "file"));
    }

    #[test]
    fn test_invalid_time_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "file,arrival_time\na,1.0\nb,soon\n").unwrap();

        let err = read_label_table(&path, &LabelTableConfig::default()).unwrap_err();
        assert!(matches!(err, StorageError::InvalidValue { row: 2, .. }));
    }

    #[test]
    fn test_format_identifier() {
        let config = LabelTableConfig::raw_catalogue();
        assert_eq!(config.format_identifier("3").as_deref(), Some("00000003.mseed"));
        assert_eq!(config.format_identifier("abc"), None);
        assert_eq!(config.format_identifier("-1"), None);

        let keep = LabelTableConfig {
            id_extension: Some(".mseed".to_string()),
            ..Default::default()
        };
        assert_eq!(keep.format_identifier("x.mseed").as_deref(), Some("x.mseed"));
    }

    #[test]
    fn test_write_relative_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_arrival_times.csv");
        write_relative_labels(
            &path,
            &[RelativeLabel {
                file: "a.mseed".to_string(),
                arrival_time: 3.5,
            }],
        )
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "file,arrival_time\na.mseed,3.5\n");

        let records = read_label_table(&path, &LabelTableConfig::default()).unwrap();
        assert_eq!(records, vec![LabeledRecord::relative("a.mseed", 3.5)]);
    }
}
