//! Dataset Error Types

use crate::summary::FailureKind;
use data_validator::ValidationError;
use feature_engine::FeatureError;
use thiserror::Error;
use waveform::SignalReadError;

/// Errors that abort a whole build
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Misconfiguration affecting every record (unknown basis, zero levels)
    #[error("Invalid extraction config: {0}")]
    Config(#[from] FeatureError),

    /// Caller requested a stop between records
    #[error("Build aborted after {processed} records")]
    Aborted { processed: usize },
}

/// Why a single record was skipped
#[derive(Debug, Clone, Error)]
pub enum FailureReason {
    /// Source could not deliver the recording
    #[error("{0}")]
    SignalRead(#[from] SignalReadError),

    /// Recording holds no samples
    #[error("Signal is empty")]
    EmptySignal,

    /// Recording failed validation
    #[error("{0}")]
    InvalidSignal(ValidationError),

    /// Feature width differs from the dataset width
    #[error("Feature length mismatch: expected {expected}, got {actual}")]
    FeatureLengthMismatch { expected: usize, actual: usize },

    /// Extraction produced a non-finite value
    #[error("Non-finite feature at index {index}")]
    NonFiniteFeature { index: usize },

    /// Any other extraction failure
    #[error("{0}")]
    Extraction(FeatureError),
}

impl FailureReason {
    /// Category used for skip counts
    pub fn kind(&self) -> FailureKind {
        match self {
            FailureReason::SignalRead(_) => FailureKind::SignalRead,
            FailureReason::EmptySignal => FailureKind::EmptySignal,
            FailureReason::InvalidSignal(_) => FailureKind::InvalidSignal,
            FailureReason::FeatureLengthMismatch { .. } => FailureKind::FeatureLengthMismatch,
            FailureReason::NonFiniteFeature { .. } => FailureKind::NonFiniteFeature,
            FailureReason::Extraction(_) => FailureKind::Extraction,
        }
    }
}

impl From<ValidationError> for FailureReason {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Empty => FailureReason::EmptySignal,
            other => FailureReason::InvalidSignal(other),
        }
    }
}

impl From<FeatureError> for FailureReason {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::EmptySignal => FailureReason::EmptySignal,
            FeatureError::FeatureLengthMismatch { expected, actual } => {
                FailureReason::FeatureLengthMismatch { expected, actual }
            }
            other => FailureReason::Extraction(other),
        }
    }
}

/// Errors assembling a dataset from stored parts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    /// Flat feature buffer does not divide into rows of the given width
    #[error("Feature buffer of {len} values does not fit width {width}")]
    BadShape { len: usize, width: usize },

    /// Parallel collections have different lengths
    #[error("Misaligned dataset: {features} feature rows, {arrival_times} arrival times, {identifiers} identifiers")]
    Misaligned {
        features: usize,
        arrival_times: usize,
        identifiers: usize,
    },
}
