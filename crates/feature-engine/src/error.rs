//! Feature Extraction Error Types

use thiserror::Error;

/// Errors during decomposition and feature assembly
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// Signal holds no samples
    #[error("Signal is empty")]
    EmptySignal,

    /// Basis name outside the supported/allowed set
    #[error("Unknown wavelet basis: {0}")]
    UnknownBasis(String),

    /// Decomposition depth must be positive
    #[error("Invalid decomposition level count: {0}")]
    InvalidLevels(usize),

    /// Assembled vector width differs from the dataset-wide width
    #[error("Feature length mismatch: expected {expected}, got {actual}")]
    FeatureLengthMismatch { expected: usize, actual: usize },
}
