//! Dataset Builder Implementation

use crate::{BuildError, BuildSummary, Dataset, FailureReason};
use data_validator::{SignalValidator, ValidationConfig};
use feature_engine::{FeatureExtractor, FeatureVector, WaveletBasis, SUPPORTED_BASES};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use waveform::{LabeledRecord, SignalSource};

/// Extraction settings, fixed for a whole build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Analyzing wavelet name
    pub basis: String,
    /// Decomposition depth
    pub levels: usize,
    /// Basis names this deployment accepts
    pub allowed_bases: Vec<String>,
    /// Per-signal validation
    pub validation: ValidationConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            basis: "db4".to_string(),
            levels: 4,
            allowed_bases: SUPPORTED_BASES.iter().map(|s| s.to_string()).collect(),
            validation: ValidationConfig::default(),
        }
    }
}

/// Cooperative stop flag checked between records
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Create a handle that has not been triggered
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the build to stop before the next record
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Check if a stop was requested
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Result of a completed build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Successfully processed records
    pub dataset: Dataset,
    /// Counts and skipped records
    pub summary: BuildSummary,
}

/// Builds aligned (features, arrival, identifier) datasets
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    extractor: FeatureExtractor,
    validator: SignalValidator,
    basis: WaveletBasis,
    levels: usize,
    abort: Option<AbortHandle>,
}

impl DatasetBuilder {
    /// Create a builder; configuration errors surface here, before any record
    pub fn new(config: BuildConfig) -> Result<Self, BuildError> {
        let basis = WaveletBasis::from_allowed(&config.basis, &config.allowed_bases)?;
        let extractor = FeatureExtractor::new(basis, config.levels)?;

        info!(
            "Creating dataset builder: basis={}, levels={}, width={}",
            basis,
            config.levels,
            extractor.dimension()
        );

        Ok(Self {
            extractor,
            validator: SignalValidator::new(config.validation),
            basis,
            levels: config.levels,
            abort: None,
        })
    }

    /// Attach a stop flag checked between records
    pub fn with_abort_handle(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }

    /// Analyzing wavelet
    pub fn basis(&self) -> WaveletBasis {
        self.basis
    }

    /// Decomposition depth
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Features per record
    pub fn width(&self) -> usize {
        self.extractor.dimension()
    }

    /// Column names in feature order
    pub fn feature_names(&self) -> Vec<String> {
        self.extractor.feature_names()
    }

    /// Process every record in order, skipping those that fail
    ///
    /// Only an abort request stops the build early; a failing record is
    /// logged, counted, and dropped.
    pub fn build(
        &self,
        records: &[LabeledRecord],
        source: &dyn SignalSource,
    ) -> Result<BuildOutput, BuildError> {
        info!("Extracting wavelet features from {} records", records.len());

        let mut dataset = Dataset::new(self.width());
        let mut summary = BuildSummary::new(self.basis.name(), self.levels);

        for (index, record) in records.iter().enumerate() {
            if self.abort.as_ref().is_some_and(AbortHandle::is_aborted) {
                warn!("Build aborted after {} of {} records", index, records.len());
                return Err(BuildError::Aborted { processed: index });
            }

            counter!("seismic_records_attempted_total").increment(1);

            let outcome = self
                .process(record, source)
                .and_then(|(features, arrival)| {
                    dataset
                        .push(record.identifier.as_str(), features.as_slice(), arrival)
                        .map_err(FailureReason::from)
                });

            match outcome {
                Ok(()) => {
                    counter!("seismic_records_succeeded_total").increment(1);
                    summary.record_success();
                }
                Err(reason) => {
                    let kind = reason.kind();
                    if matches!(reason, FailureReason::FeatureLengthMismatch { .. }) {
                        error!("Error processing {}: {}", record.identifier, reason);
                    } else {
                        warn!("Error processing {}: {}", record.identifier, reason);
                    }
                    counter!("seismic_records_skipped_total", "cause" => kind.as_str())
                        .increment(1);
                    summary.record_failure(&record.identifier, &reason);
                }
            }
        }

        summary.finish();

        info!(
            "Build finished: attempted={}, succeeded={}, skipped={} {:?}",
            summary.attempted,
            summary.succeeded,
            summary.skipped_total(),
            summary.skipped
        );
        if summary.no_usable_data() {
            warn!(
                "No usable records: all {} records were skipped",
                summary.attempted
            );
        }

        Ok(BuildOutput { dataset, summary })
    }

    /// Extract one record: features plus arrival relative to the recording start
    pub fn process(
        &self,
        record: &LabeledRecord,
        source: &dyn SignalSource,
    ) -> Result<(FeatureVector, f64), FailureReason> {
        let signal = source.read(&record.identifier)?;
        self.validator.validate(&signal)?;

        let features = self.extractor.extract_signal(&signal)?;
        if let Some(index) = features.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(FailureReason::NonFiniteFeature { index });
        }

        // Absolute labels are converted against this recording's start;
        // relative labels pass through unchanged.
        let arrival = record.arrival.relative_to(&signal);

        debug!(
            "Processed {}: {} samples at {} Hz, arrival {:.3}s",
            record.identifier,
            signal.len(),
            signal.sampling_rate(),
            arrival
        );

        Ok((features, arrival))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use feature_engine::FeatureError;
    use waveform::{MemorySignalSource, Signal};

    fn sine_signal(n: usize) -> Signal {
        let samples = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 4.0 * i as f64 / 100.0).sin())
            .collect();
        Signal::new(samples, 100.0, DateTime::from_timestamp(1_600_000_000, 0).unwrap())
    }

    #[test]
    fn test_unknown_basis_is_fatal() {
        let err = DatasetBuilder::new(BuildConfig {
            basis: "mexh".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            BuildError::Config(FeatureError::UnknownBasis("mexh".to_string()))
        );
    }

    #[test]
    fn test_basis_outside_whitelist_is_fatal() {
        let err = DatasetBuilder::new(BuildConfig {
            basis: "sym4".to_string(),
            allowed_bases: vec!["db4".to_string()],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, BuildError::Config(FeatureError::UnknownBasis(_))));
    }

    #[test]
    fn test_zero_levels_is_fatal() {
        let err = DatasetBuilder::new(BuildConfig {
            levels: 0,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, BuildError::Config(FeatureError::InvalidLevels(0)));
    }

    #[test]
    fn test_process_single_record() {
        let builder = DatasetBuilder::new(BuildConfig::default()).unwrap();
        let source = MemorySignalSource::new().with_signal("a", sine_signal(256));
        let (features, arrival) = builder
            .process(&LabeledRecord::relative("a", 1.25), &source)
            .unwrap();
        assert_eq!(features.len(), 60);
        assert_eq!(arrival, 1.25);
    }

    #[test]
    fn test_empty_signal_is_skipped() {
        let builder = DatasetBuilder::new(BuildConfig::default()).unwrap();
        let source = MemorySignalSource::new()
            .with_signal("empty", Signal::new(vec![], 100.0, DateTime::UNIX_EPOCH))
            .with_signal("ok", sine_signal(128));
        let records = vec![
            LabeledRecord::relative("empty", 0.0),
            LabeledRecord::relative("ok", 0.3),
        ];

        let output = builder.build(&records, &source).unwrap();
        assert_eq!(output.dataset.len(), 1);
        assert_eq!(output.summary.skipped_by(crate::FailureKind::EmptySignal), 1);
    }

    #[test]
    fn test_abort_between_records() {
        let handle = AbortHandle::new();
        let builder = DatasetBuilder::new(BuildConfig::default())
            .unwrap()
            .with_abort_handle(handle.clone());
        let source = MemorySignalSource::new().with_signal("a", sine_signal(64));
        let records = vec![LabeledRecord::relative("a", 0.1)];

        handle.abort();
        assert_eq!(
            builder.build(&records, &source).unwrap_err(),
            BuildError::Aborted { processed: 0 }
        );
    }

    #[test]
    fn test_overflowing_signal_is_skipped() {
        let builder = DatasetBuilder::new(BuildConfig {
            basis: "haar".to_string(),
            levels: 2,
            ..Default::default()
        })
        .unwrap();
        let huge = Signal::new(vec![f64::MAX; 16], 100.0, DateTime::UNIX_EPOCH);
        let source = MemorySignalSource::new()
            .with_signal("huge", huge)
            .with_signal("ok", sine_signal(64));
        let records = vec![
            LabeledRecord::relative("huge", 0.0),
            LabeledRecord::relative("ok", 0.2),
        ];

        let output = builder.build(&records, &source).unwrap();
        assert_eq!(output.dataset.len(), 1);
        assert!(output.dataset.features().iter().all(|v| v.is_finite()));
        assert_eq!(
            output.summary.skipped_by(crate::FailureKind::NonFiniteFeature),
            1
        );
    }
}
