//! Feature Engineering Engine
//!
//! Provides multi-level wavelet decomposition and per-band statistical
//! summaries for arrival-time regression.

mod error;
mod features;
mod statistics;
mod wavelet;

pub use error::FeatureError;
pub use features::{
    feature_dimension, feature_names, FeatureAssembler, FeatureExtractor, FeatureVector,
};
pub use statistics::{
    percentile_sorted, summarize, BandStatistics, STATISTIC_NAMES, STATS_PER_BAND,
};
pub use wavelet::{
    max_useful_level, BandKind, CoefficientBand, WaveletBasis, WaveletDecomposer,
    SUPPORTED_BASES,
};
