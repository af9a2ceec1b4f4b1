//! Storage Layer
//!
//! Reads labeled arrival tables and persists built datasets, summaries, and
//! validation reports.

mod labels;
mod report;
mod repository;

pub use labels::{read_label_table, write_relative_labels, LabelTableConfig, TimeBasis};
pub use report::write_validation_report;
pub use repository::{write_json, DatasetSnapshot, DatasetStore, SavedDataset};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Invalid value {value:?} in column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error("Corrupt dataset: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<csv::Error> for StorageError {
    fn from(err: csv::Error) -> Self {
        StorageError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<postcard::Error> for StorageError {
    fn from(err: postcard::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
