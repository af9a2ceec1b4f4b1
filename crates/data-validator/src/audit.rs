//! Dataset Audits
//!
//! Sampling-rate census and signal length statistics over a set of records.
//! Unreadable records are logged and counted, never fatal.

use feature_engine::percentile_sorted;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use waveform::{SignalReadError, SignalSource};

/// Distribution of sampling rates across recordings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SamplingRateCensus {
    /// (rate in Hz, number of recordings), ascending by rate
    pub counts: Vec<(f64, usize)>,
    /// Identifiers that could not be read, with the cause
    pub failures: Vec<(String, String)>,
}

impl SamplingRateCensus {
    /// Build the census from already-known rates
    pub fn from_rates(rates: &[f64]) -> Self {
        let mut sorted = rates.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut counts: Vec<(f64, usize)> = Vec::new();
        for rate in sorted {
            match counts.last_mut() {
                Some((last, count)) if last.to_bits() == rate.to_bits() => *count += 1,
                _ => counts.push((rate, 1)),
            }
        }

        Self {
            counts,
            failures: Vec::new(),
        }
    }

    /// Read every identifier from `source` and tally its sampling rate
    pub fn collect<I>(identifiers: I, source: &dyn SignalSource) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut rates = Vec::new();
        let mut failures = Vec::new();

        for id in identifiers {
            let id = id.as_ref();
            match source.read(id) {
                Ok(signal) => rates.push(signal.sampling_rate()),
                Err(e) => {
                    warn!("Error reading {}: {}", id, e);
                    failures.push((id.to_string(), e.to_string()));
                }
            }
        }

        let mut census = Self::from_rates(&rates);
        census.failures = failures;
        info!(
            "Sampling-rate census: {} recordings, {} distinct rates, {} unreadable",
            census.total(),
            census.counts.len(),
            census.failures.len()
        );
        census
    }

    /// Number of recordings counted
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Lowest sampling rate seen
    pub fn min_rate(&self) -> Option<f64> {
        self.counts.first().map(|(rate, _)| *rate)
    }

    /// Recordings sampled at exactly `rate`
    pub fn count_for(&self, rate: f64) -> usize {
        self.counts
            .iter()
            .find(|(r, _)| r.to_bits() == rate.to_bits())
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Summary of signal lengths (in samples)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthStatistics {
    pub min_length: usize,
    pub max_length: usize,
    pub mean_length: f64,
    pub median_length: f64,
    /// Population standard deviation
    pub std_length: f64,
    pub p95_length: f64,
    pub num_signals: usize,
}

impl LengthStatistics {
    /// Summarize a set of lengths; `None` when there are none
    pub fn from_lengths(lengths: &[usize]) -> Option<Self> {
        if lengths.is_empty() {
            return None;
        }

        let mut sorted: Vec<f64> = lengths.iter().map(|&l| l as f64).collect();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            min_length: lengths.iter().copied().min().unwrap_or(0),
            max_length: lengths.iter().copied().max().unwrap_or(0),
            mean_length: mean,
            median_length: percentile_sorted(&sorted, 50.0),
            std_length: variance.sqrt(),
            p95_length: percentile_sorted(&sorted, 95.0),
            num_signals: lengths.len(),
        })
    }
}

/// Read every identifier and collect its sample count
pub fn collect_lengths<I>(
    identifiers: I,
    source: &dyn SignalSource,
) -> (Vec<usize>, Vec<(String, SignalReadError)>)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut lengths = Vec::new();
    let mut failures = Vec::new();

    for id in identifiers {
        let id = id.as_ref();
        match source.read(id) {
            Ok(signal) => lengths.push(signal.len()),
            Err(e) => {
                warn!("Error processing {}: {}", id, e);
                failures.push((id.to_string(), e));
            }
        }
    }

    (lengths, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use proptest::prelude::*;
    use waveform::{MemorySignalSource, Signal};

    fn source() -> MemorySignalSource {
        let start = DateTime::UNIX_EPOCH;
        MemorySignalSource::new()
            .with_signal("a", Signal::new(vec![0.0; 100], 100.0, start))
            .with_signal("b", Signal::new(vec![0.0; 300], 50.0, start))
            .with_signal("c", Signal::new(vec![0.0; 200], 100.0, start))
    }

    #[test]
    fn test_census_counts() {
        let census = SamplingRateCensus::collect(["a", "b", "c", "missing"], &source());
        assert_eq!(census.counts, vec![(50.0, 1), (100.0, 2)]);
        assert_eq!(census.total(), 3);
        assert_eq!(census.min_rate(), Some(50.0));
        assert_eq!(census.count_for(100.0), 2);
        assert_eq!(census.count_for(20.0), 0);
        assert_eq!(census.failures.len(), 1);
        assert_eq!(census.failures[0].0, "missing");
    }

    #[test]
    fn test_empty_census() {
        let census = SamplingRateCensus::from_rates(&[]);
        assert_eq!(census.total(), 0);
        assert_eq!(census.min_rate(), None);
    }

    #[test]
    fn test_length_statistics() {
        let (lengths, failures) = collect_lengths(["a", "b", "c", "x"], &source());
        assert_eq!(lengths, vec![100, 300, 200]);
        assert_eq!(failures.len(), 1);

        let stats = LengthStatistics::from_lengths(&lengths).unwrap();
        assert_eq!(stats.min_length, 100);
        assert_eq!(stats.max_length, 300);
        assert_eq!(stats.num_signals, 3);
        assert!((stats.mean_length - 200.0).abs() < 1e-9);
        assert!((stats.median_length - 200.0).abs() < 1e-9);
        assert!((stats.std_length - (20_000.0_f64 / 3.0).sqrt()).abs() < 1e-9);
        // rank 0.95 * 2 = 1.9 -> 200 + 0.9 * 100
        assert!((stats.p95_length - 290.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_statistics_empty() {
        assert!(LengthStatistics::from_lengths(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_length_statistics_ordered(lengths in prop::collection::vec(1usize..100_000, 1..50)) {
            let stats = LengthStatistics::from_lengths(&lengths).unwrap();
            let (min, max) = (stats.min_length as f64, stats.max_length as f64);
            prop_assert!(min <= stats.median_length && stats.median_length <= max);
            prop_assert!(stats.median_length <= stats.p95_length && stats.p95_length <= max);
            prop_assert!(min - 1e-9 <= stats.mean_length && stats.mean_length <= max + 1e-9);
            prop_assert!(stats.std_length >= 0.0);
            prop_assert_eq!(stats.num_signals, lengths.len());
        }
    }
}
