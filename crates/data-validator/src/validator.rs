//! Signal Validator

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use waveform::Signal;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum number of samples a usable signal must hold
    pub min_samples: usize,
    /// Accepted sampling rate range (Hz), inclusive
    pub sampling_rate_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_samples: 1,
            sampling_rate_range: (f64::MIN_POSITIVE, 1.0e6),
        }
    }
}

/// Checks a signal before it reaches the decomposer
#[derive(Debug, Clone)]
pub struct SignalValidator {
    config: ValidationConfig,
}

impl SignalValidator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate sample count, sampling rate, and sample values
    pub fn validate(&self, signal: &Signal) -> Result<(), ValidationError> {
        if signal.is_empty() {
            return Err(ValidationError::Empty);
        }
        self.validate_length(signal.len())?;
        self.validate_sampling_rate(signal.sampling_rate())?;
        self.validate_samples(signal.samples())
    }

    /// Validate the sample count against the configured minimum
    pub fn validate_length(&self, len: usize) -> Result<(), ValidationError> {
        if len < self.config.min_samples {
            Err(ValidationError::TooShort {
                len,
                min: self.config.min_samples,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a sampling rate against the configured range
    pub fn validate_sampling_rate(&self, rate: f64) -> Result<(), ValidationError> {
        let (min, max) = self.config.sampling_rate_range;
        if !rate.is_finite() || rate < min || rate > max {
            Err(ValidationError::InvalidSamplingRate(rate))
        } else {
            Ok(())
        }
    }

    /// Reject the first NaN or infinite sample
    pub fn validate_samples(&self, samples: &[f64]) -> Result<(), ValidationError> {
        match samples.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(ValidationError::NonFiniteSample {
                index,
                value: samples[index],
            }),
            None => Ok(()),
        }
    }
}

impl Default for SignalValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn signal(samples: Vec<f64>, rate: f64) -> Signal {
        Signal::new(samples, rate, DateTime::UNIX_EPOCH)
    }

    #[test]
    fn test_valid_signal() {
        let validator = SignalValidator::default();
        assert!(validator.validate(&signal(vec![0.1, -0.2, 0.3], 100.0)).is_ok());
    }

    #[test]
    fn test_empty_signal() {
        let validator = SignalValidator::default();
        assert_eq!(
            validator.validate(&signal(vec![], 100.0)),
            Err(ValidationError::Empty)
        );
    }

    #[test]
    fn test_non_finite_sample() {
        let validator = SignalValidator::default();
        let err = validator
            .validate(&signal(vec![1.0, 2.0, f64::INFINITY], 100.0))
            .unwrap_err();
        assert!(matches!(err, ValidationError::NonFiniteSample { index: 2, .. }));
        assert!(validator.validate_samples(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_sampling_rate_range() {
        let validator = SignalValidator::default();
        assert!(validator.validate_sampling_rate(100.0).is_ok());
        assert!(validator.validate_sampling_rate(0.0).is_err());
        assert!(validator.validate_sampling_rate(-50.0).is_err());
        assert!(validator.validate_sampling_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_minimum_length() {
        let validator = SignalValidator::new(ValidationConfig {
            min_samples: 16,
            ..Default::default()
        });
        assert_eq!(
            validator.validate(&signal(vec![0.0; 8], 100.0)),
            Err(ValidationError::TooShort { len: 8, min: 16 })
        );
        assert!(validator.validate(&signal(vec![0.0; 16], 100.0)).is_ok());
    }
}
