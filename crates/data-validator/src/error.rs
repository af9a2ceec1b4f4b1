//! Validation Error Types

use thiserror::Error;

/// Reasons a signal is unusable for feature extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Signal holds no samples
    #[error("Signal is empty")]
    Empty,

    /// NaN or infinite sample
    #[error("Non-finite sample {value} at index {index}")]
    NonFiniteSample { index: usize, value: f64 },

    /// Sampling rate is zero, negative, or not a number
    #[error("Invalid sampling rate: {0} Hz")]
    InvalidSamplingRate(f64),

    /// Fewer samples than the configured minimum
    #[error("Signal too short: {len} samples, minimum {min}")]
    TooShort { len: usize, min: usize },
}
