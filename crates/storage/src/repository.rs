//! Dataset Repository
//!
//! Writes a built dataset as CSV tables, a postcard snapshot, and a JSON
//! summary under one output directory.

use crate::{write_relative_labels, StorageError};
use dataset::{BuildSummary, Dataset, RelativeLabel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Binary form of a dataset, loadable by downstream consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSnapshot {
    pub basis: String,
    pub levels: usize,
    pub width: usize,
    /// Row-major feature matrix
    pub features: Vec<f64>,
    pub arrival_times: Vec<f64>,
    pub identifiers: Vec<String>,
}

impl DatasetSnapshot {
    /// Capture a dataset built with `basis` at `levels`
    pub fn new(basis: impl Into<String>, levels: usize, dataset: &Dataset) -> Self {
        Self {
            basis: basis.into(),
            levels,
            width: dataset.width(),
            features: dataset.to_flat_features(),
            arrival_times: dataset.arrival_times().to_vec(),
            identifiers: dataset.identifiers().to_vec(),
        }
    }

    /// Rebuild the in-memory dataset
    pub fn into_dataset(self) -> Result<Dataset, StorageError> {
        Dataset::from_parts(
            self.width,
            self.features,
            self.arrival_times,
            self.identifiers,
        )
        .map_err(|e| StorageError::Corrupt(e.to_string()))
    }
}

/// Paths written by [`DatasetStore::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDataset {
    pub features_csv: PathBuf,
    pub labels_csv: PathBuf,
    pub snapshot: PathBuf,
    pub summary_json: PathBuf,
}

/// Output directory for named datasets
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Create a store rooted at `root`; the directory is created on save
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, file_name: String) -> PathBuf {
        self.root.join(file_name)
    }

    /// Persist a dataset and its build summary under `name`
    pub fn save(
        &self,
        name: &str,
        dataset: &Dataset,
        feature_names: &[String],
        summary: &BuildSummary,
    ) -> Result<SavedDataset, StorageError> {
        if feature_names.len() != dataset.width() {
            return Err(StorageError::Corrupt(format!(
                "{} feature names for width {}",
                feature_names.len(),
                dataset.width()
            )));
        }

        fs::create_dir_all(&self.root)?;

        let saved = SavedDataset {
            features_csv: self.path(format!("{name}_features.csv")),
            labels_csv: self.path(format!("{name}.csv")),
            snapshot: self.path(format!("{name}.bin")),
            summary_json: self.path(format!("{name}_summary.json")),
        };

        write_feature_table(&saved.features_csv, dataset, feature_names)?;

        let labels: Vec<RelativeLabel> = dataset
            .rows()
            .map(|(id, _, arrival)| RelativeLabel {
                file: id.to_string(),
                arrival_time: arrival,
            })
            .collect();
        write_relative_labels(&saved.labels_csv, &labels)?;

        let snapshot = DatasetSnapshot::new(summary.basis.as_str(), summary.levels, dataset);
        let bytes = postcard::to_allocvec(&snapshot)?;
        fs::write(&saved.snapshot, &bytes)?;
        debug!("Wrote {} byte snapshot to {}", bytes.len(), saved.snapshot.display());

        write_json(&saved.summary_json, summary)?;

        info!(
            "Saved dataset '{}' ({} rows x {} features) to {}",
            name,
            dataset.len(),
            dataset.width(),
            self.root.display()
        );
        Ok(saved)
    }

    /// Load the postcard snapshot saved under `name`
    pub fn load_snapshot(&self, name: &str) -> Result<DatasetSnapshot, StorageError> {
        let path = self.path(format!("{name}.bin"));
        let bytes = fs::read(&path)?;
        let snapshot: DatasetSnapshot = postcard::from_bytes(&bytes)?;
        debug!(
            "Loaded snapshot {}: {} rows",
            path.display(),
            snapshot.identifiers.len()
        );
        Ok(snapshot)
    }

    /// Load the dataset saved under `name`
    pub fn load(&self, name: &str) -> Result<Dataset, StorageError> {
        self.load_snapshot(name)?.into_dataset()
    }
}

fn write_feature_table(
    path: &Path,
    dataset: &Dataset,
    feature_names: &[String],
) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(feature_names)?;
    for row in dataset.features().rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Pretty-print `value` as JSON to `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
