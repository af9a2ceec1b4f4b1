//! Signal Sources

use crate::{Signal, SignalReadError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fetches a recording by identifier
///
/// Implementations must never fabricate data: a recording that cannot be
/// read is reported as an error.
pub trait SignalSource: Send + Sync {
    /// Read the recording named by `identifier`
    fn read(&self, identifier: &str) -> Result<Signal, SignalReadError>;
}

/// In-memory source keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct MemorySignalSource {
    signals: HashMap<String, Signal>,
}

impl MemorySignalSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a recording
    pub fn insert(&mut self, identifier: impl Into<String>, signal: Signal) {
        self.signals.insert(identifier.into(), signal);
    }

    /// Builder-style insert
    pub fn with_signal(mut self, identifier: impl Into<String>, signal: Signal) -> Self {
        self.insert(identifier, signal);
        self
    }

    /// Number of stored recordings
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Check if the source holds no recordings
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl SignalSource for MemorySignalSource {
    fn read(&self, identifier: &str) -> Result<Signal, SignalReadError> {
        self.signals
            .get(identifier)
            .cloned()
            .ok_or_else(|| SignalReadError::NotFound(identifier.to_string()))
    }
}

/// On-disk waveform document
///
/// ```json
/// { "sampling_rate": 100.0, "start_time": "2020-09-13T12:26:40Z", "samples": [0.1, 0.2] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformDocument {
    /// Sampling rate (Hz)
    pub sampling_rate: f64,
    /// Timestamp of the first sample
    pub start_time: DateTime<Utc>,
    /// Amplitude samples
    pub samples: Vec<f64>,
}

impl From<&Signal> for WaveformDocument {
    fn from(signal: &Signal) -> Self {
        Self {
            sampling_rate: signal.sampling_rate(),
            start_time: signal.start_time(),
            samples: signal.samples().to_vec(),
        }
    }
}

impl From<WaveformDocument> for Signal {
    fn from(doc: WaveformDocument) -> Self {
        Signal::new(doc.samples, doc.sampling_rate, doc.start_time)
    }
}

/// Directory of JSON waveform documents
///
/// A record named `id` is read from `<root>/id`, falling back to
/// `<root>/id.json`. Identifiers must be plain file names.
#[derive(Debug, Clone)]
pub struct JsonWaveformSource {
    root: PathBuf,
}

impl JsonWaveformSource {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, identifier: &str) -> Result<PathBuf, SignalReadError> {
        let plain_name = !identifier.is_empty()
            && identifier != "."
            && identifier != ".."
            && !identifier.contains(|c: char| c == '/' || c == '\\')
            && Path::new(identifier).is_relative();
        if !plain_name {
            return Err(SignalReadError::InvalidIdentifier(identifier.to_string()));
        }

        let direct = self.root.join(identifier);
        if direct.is_file() {
            return Ok(direct);
        }
        let with_ext = self.root.join(format!("{identifier}.json"));
        if with_ext.is_file() {
            Ok(with_ext)
        } else {
            Err(SignalReadError::NotFound(identifier.to_string()))
        }
    }
}

impl SignalSource for JsonWaveformSource {
    fn read(&self, identifier: &str) -> Result<Signal, SignalReadError> {
        let path = self.resolve(identifier)?;

        debug!("Reading waveform {} from {}", identifier, path.display());

        let text = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SignalReadError::NotFound(identifier.to_string()),
            _ => SignalReadError::Io {
                identifier: identifier.to_string(),
                message: e.to_string(),
            },
        })?;

        let doc: WaveformDocument =
            serde_json::from_str(&text).map_err(|e| SignalReadError::Malformed {
                identifier: identifier.to_string(),
                message: e.to_string(),
            })?;

        Ok(doc.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signal() -> Signal {
        Signal::new(
            vec![0.5, -0.25, 1.0],
            50.0,
            DateTime::from_timestamp(1_600_000_000, 0).unwrap(),
        )
    }

    #[test]
    fn test_memory_source_lookup() {
        let source = MemorySignalSource::new().with_signal("a", sample_signal());
        assert_eq!(source.read("a").unwrap(), sample_signal());
        assert!(matches!(source.read("b"), Err(SignalReadError::NotFound(id)) if id == "b"));
    }

    #[test]
    fn test_json_source_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = WaveformDocument::from(&sample_signal());
        std::fs::write(dir.path().join("00000001.json"), serde_json::to_string(&doc).unwrap())
            .unwrap();

        let source = JsonWaveformSource::new(dir.path());
        assert_eq!(source.read("00000001").unwrap(), sample_signal());
        assert_eq!(source.read("00000001.json").unwrap(), sample_signal());
    }

    #[test]
    fn test_json_source_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{\"samples\": [1.0]").unwrap();

        let source = JsonWaveformSource::new(dir.path());
        assert!(matches!(source.read("absent"), Err(SignalReadError::NotFound(_))));
        let err = source.read("broken").unwrap_err();
        assert!(matches!(err, SignalReadError::Malformed { .. }));
        assert_eq!(err.identifier(), "broken");
    }

    #[test]
    fn test_json_source_stays_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data");
        std::fs::create_dir_all(&root).unwrap();
        let doc = WaveformDocument::from(&sample_signal());
        std::fs::write(dir.path().join("outside.json"), serde_json::to_string(&doc).unwrap())
            .unwrap();

        let source = JsonWaveformSource::new(&root);
        for id in ["../outside", "../outside.json", "sub/x", "..", "", "a\\b"] {
            assert!(
                matches!(source.read(id), Err(SignalReadError::InvalidIdentifier(_))),
                "{id:?} was accepted"
            );
        }
    }
}
