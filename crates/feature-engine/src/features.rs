//! Feature Vector Assembly

use crate::statistics::{BandStatistics, STATISTIC_NAMES, STATS_PER_BAND};
use crate::wavelet::{BandKind, CoefficientBand, WaveletBasis, WaveletDecomposer};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use tracing::debug;
use waveform::Signal;

/// Feature width for a decomposition of `levels` levels
pub fn feature_dimension(levels: usize) -> usize {
    STATS_PER_BAND * (levels + 1)
}

/// Column names in feature order (`cA4_mean`, ..., `cD1_median_abs`)
pub fn feature_names(levels: usize) -> Vec<String> {
    let kinds = std::iter::once(BandKind::Approximation { level: levels })
        .chain((1..=levels).rev().map(|level| BandKind::Detail { level }));

    kinds
        .flat_map(|kind| {
            let label = kind.label();
            STATISTIC_NAMES
                .iter()
                .map(move |stat| format!("{label}_{stat}"))
        })
        .collect()
}

/// Per-signal feature vector
///
/// Band order is outer, statistic order inner, so column `i` means the same
/// thing for every record built with the same level count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Raw feature values
    pub values: Vec<f64>,
    /// Number of bands summarized
    pub band_count: usize,
}

impl FeatureVector {
    /// Number of features
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the vector holds no features
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Feature values
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Concatenates band statistics into a fixed-width vector
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    expected_len: usize,
}

impl FeatureAssembler {
    /// Create an assembler expecting `levels + 1` bands
    pub fn new(levels: usize) -> Self {
        Self {
            expected_len: feature_dimension(levels),
        }
    }

    /// Width every assembled vector must have
    pub fn expected_len(&self) -> usize {
        self.expected_len
    }

    /// Summarize `bands` in order and concatenate the results
    pub fn assemble(bands: &[CoefficientBand]) -> FeatureVector {
        let mut values = Vec::with_capacity(bands.len() * STATS_PER_BAND);
        for band in bands {
            values.extend(BandStatistics::compute(&band.coefficients).to_array());
        }
        FeatureVector {
            values,
            band_count: bands.len(),
        }
    }

    /// Assemble and verify the width against the dataset-wide width
    pub fn assemble_checked(&self, bands: &[CoefficientBand]) -> Result<FeatureVector, FeatureError> {
        let vector = Self::assemble(bands);
        if vector.len() != self.expected_len {
            return Err(FeatureError::FeatureLengthMismatch {
                expected: self.expected_len,
                actual: vector.len(),
            });
        }
        Ok(vector)
    }
}

/// Decomposes signals and assembles their feature vectors
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    decomposer: WaveletDecomposer,
    assembler: FeatureAssembler,
}

impl FeatureExtractor {
    /// Create an extractor for a fixed basis and depth
    pub fn new(basis: WaveletBasis, levels: usize) -> Result<Self, FeatureError> {
        Ok(Self {
            decomposer: WaveletDecomposer::new(basis, levels)?,
            assembler: FeatureAssembler::new(levels),
        })
    }

    /// Underlying decomposer
    pub fn decomposer(&self) -> &WaveletDecomposer {
        &self.decomposer
    }

    /// Output width
    pub fn dimension(&self) -> usize {
        self.assembler.expected_len()
    }

    /// Column names for the output width
    pub fn feature_names(&self) -> Vec<String> {
        feature_names(self.decomposer.levels())
    }

    /// Extract features from raw samples
    pub fn extract(&self, samples: &[f64]) -> Result<FeatureVector, FeatureError> {
        let bands = self.decomposer.decompose(samples)?;
        debug!(
            "Decomposed {} samples into {} bands: {:?}",
            samples.len(),
            bands.len(),
            bands.iter().map(|b| b.len()).collect::<Vec<_>>()
        );
        self.assembler.assemble_checked(&bands)
    }

    /// Extract features from a signal's samples
    pub fn extract_signal(&self, signal: &Signal) -> Result<FeatureVector, FeatureError> {
        self.extract(signal.samples())
    }
}
