//! Waveform Signal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-channel seismic recording
///
/// Samples are immutable once the signal is constructed; the pipeline reads
/// one signal per record and drops it after feature extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    samples: Vec<f64>,
    sampling_rate: f64,
    start_time: DateTime<Utc>,
}

impl Signal {
    /// Create a signal from raw samples
    pub fn new(samples: Vec<f64>, sampling_rate: f64, start_time: DateTime<Utc>) -> Self {
        Self {
            samples,
            sampling_rate,
            start_time,
        }
    }

    /// Amplitude samples in recording order
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the recording holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampling rate (Hz)
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Absolute timestamp of the first sample
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Recording length in seconds (0 when the rate is not positive)
    pub fn duration_secs(&self) -> f64 {
        if self.sampling_rate > 0.0 {
            self.samples.len() as f64 / self.sampling_rate
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let signal = Signal::new(vec![0.0; 250], 100.0, DateTime::UNIX_EPOCH);
        assert!((signal.duration_secs() - 2.5).abs() < 1e-12);
        assert_eq!(signal.len(), 250);
    }

    #[test]
    fn test_duration_with_invalid_rate() {
        let signal = Signal::new(vec![1.0; 10], 0.0, DateTime::UNIX_EPOCH);
        assert_eq!(signal.duration_secs(), 0.0);
    }
}
