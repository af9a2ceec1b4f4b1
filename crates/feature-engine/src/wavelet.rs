//! Multi-Level Discrete Wavelet Decomposition
//!
//! Splits a signal into one coarse approximation and a detail band per level.
//!
//! # Boundary Policy
//!
//! The signal is extended by half-sample symmetric reflection, repeated as
//! often as needed for signals shorter than the filter:
//! ```text
//! ... x1 x0 | x0 x1 ... x(n-1) | x(n-1) x(n-2) ...
//! ```
//! Each level keeps the odd-indexed outputs of the full convolution, so a
//! level maps `n` samples to `floor((n + L - 1) / 2)` coefficients for a
//! filter of length `L`. Lengths never reach zero, which lets very short
//! signals decompose to any depth.

use crate::FeatureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Basis names accepted by [`WaveletBasis::from_str`]
pub const SUPPORTED_BASES: &[&str] = &[
    "haar", "db1", "db2", "db3", "db4", "sym2", "sym3", "sym4", "coif1",
];

const HAAR_DEC_LO: [f64; 2] = [0.7071067811865476, 0.7071067811865476];

const DB2_DEC_LO: [f64; 4] = [
    -0.12940952255092145,
    0.22414386804185735,
    0.836516303737469,
    0.48296291314469025,
];

const DB3_DEC_LO: [f64; 6] = [
    0.035226291882100656,
    -0.08544127388224149,
    -0.13501102001039084,
    0.4598775021193313,
    0.8068915093133388,
    0.3326705529509569,
];

const DB4_DEC_LO: [f64; 8] = [
    -0.010597401784997278,
    0.032883011666982945,
    0.030841381835986965,
    -0.18703481171888114,
    -0.02798376941698385,
    0.6308807679295904,
    0.7148465705525415,
    0.23037781330885523,
];

const SYM4_DEC_LO: [f64; 8] = [
    -0.07576571478927333,
    -0.02963552764599851,
    0.49761866763201545,
    0.8037387518059161,
    0.29785779560527736,
    -0.09921954357684722,
    -0.012603967262037833,
    0.0322231006040427,
];

const COIF1_DEC_LO: [f64; 6] = [
    -0.01565572813546454,
    -0.0727326195128539,
    0.38486484686420286,
    0.8525720202122554,
    0.3378976624578092,
    -0.0727326195128539,
];

/// Orthogonal analyzing wavelet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveletBasis {
    /// Haar (also accepted as `db1`)
    Haar,
    /// Daubechies, 2 vanishing moments
    Db2,
    /// Daubechies, 3 vanishing moments
    Db3,
    /// Daubechies, 4 vanishing moments
    Db4,
    /// Symlet 2 (same filter as db2)
    Sym2,
    /// Symlet 3 (same filter as db3)
    Sym3,
    /// Symlet 4
    Sym4,
    /// Coiflet 1
    Coif1,
}

impl WaveletBasis {
    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            WaveletBasis::Haar => "haar",
            WaveletBasis::Db2 => "db2",
            WaveletBasis::Db3 => "db3",
            WaveletBasis::Db4 => "db4",
            WaveletBasis::Sym2 => "sym2",
            WaveletBasis::Sym3 => "sym3",
            WaveletBasis::Sym4 => "sym4",
            WaveletBasis::Coif1 => "coif1",
        }
    }

    /// Low-pass decomposition filter
    pub fn dec_lo(&self) -> &'static [f64] {
        match self {
            WaveletBasis::Haar => &HAAR_DEC_LO,
            WaveletBasis::Db2 | WaveletBasis::Sym2 => &DB2_DEC_LO,
            WaveletBasis::Db3 | WaveletBasis::Sym3 => &DB3_DEC_LO,
            WaveletBasis::Db4 => &DB4_DEC_LO,
            WaveletBasis::Sym4 => &SYM4_DEC_LO,
            WaveletBasis::Coif1 => &COIF1_DEC_LO,
        }
    }

    /// High-pass decomposition filter (quadrature mirror of `dec_lo`)
    pub fn dec_hi(&self) -> Vec<f64> {
        let lo = self.dec_lo();
        let len = lo.len();
        (0..len)
            .map(|k| {
                let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
                sign * lo[len - 1 - k]
            })
            .collect()
    }

    /// Filter length
    pub fn filter_len(&self) -> usize {
        self.dec_lo().len()
    }

    /// Resolve `name` against a configured whitelist
    ///
    /// The name must be both supported and present in `allowed`. An empty
    /// whitelist allows every supported basis.
    pub fn from_allowed(name: &str, allowed: &[String]) -> Result<Self, FeatureError> {
        let basis: WaveletBasis = name.parse()?;
        if allowed.is_empty() || allowed.iter().any(|a| a.eq_ignore_ascii_case(name.trim())) {
            Ok(basis)
        } else {
            Err(FeatureError::UnknownBasis(name.to_string()))
        }
    }
}

impl FromStr for WaveletBasis {
    type Err = FeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "haar" | "db1" => Ok(WaveletBasis::Haar),
            "db2" => Ok(WaveletBasis::Db2),
            "db3" => Ok(WaveletBasis::Db3),
            "db4" => Ok(WaveletBasis::Db4),
            "sym2" => Ok(WaveletBasis::Sym2),
            "sym3" => Ok(WaveletBasis::Sym3),
            "sym4" => Ok(WaveletBasis::Sym4),
            "coif1" => Ok(WaveletBasis::Coif1),
            _ => Err(FeatureError::UnknownBasis(s.to_string())),
        }
    }
}

impl fmt::Display for WaveletBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Role of a coefficient band within a decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandKind {
    /// Final-level approximation
    Approximation { level: usize },
    /// Detail coefficients of one level
    Detail { level: usize },
}

impl BandKind {
    /// Short label (`cA4`, `cD1`, ...)
    pub fn label(&self) -> String {
        match self {
            BandKind::Approximation { level } => format!("cA{level}"),
            BandKind::Detail { level } => format!("cD{level}"),
        }
    }
}

/// One sub-band of a decomposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientBand {
    /// Approximation or detail, with its level
    pub kind: BandKind,
    /// Coefficients in time order
    pub coefficients: Vec<f64>,
}

impl CoefficientBand {
    /// Number of coefficients
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    /// Check if the band holds no coefficients
    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Deepest level at which the last band still sees one full filter span
pub fn max_useful_level(signal_len: usize, filter_len: usize) -> usize {
    if filter_len < 2 || signal_len < filter_len - 1 {
        return 0;
    }
    let ratio = signal_len / (filter_len - 1);
    if ratio == 0 {
        0
    } else {
        ratio.ilog2() as usize
    }
}

/// Fixed-basis, fixed-depth decomposer
#[derive(Debug, Clone)]
pub struct WaveletDecomposer {
    basis: WaveletBasis,
    levels: usize,
    dec_hi: Vec<f64>,
}

impl WaveletDecomposer {
    /// Create a decomposer; `levels` must be at least 1
    pub fn new(basis: WaveletBasis, levels: usize) -> Result<Self, FeatureError> {
        if levels == 0 {
            return Err(FeatureError::InvalidLevels(levels));
        }
        Ok(Self {
            basis,
            levels,
            dec_hi: basis.dec_hi(),
        })
    }

    /// Analyzing wavelet
    pub fn basis(&self) -> WaveletBasis {
        self.basis
    }

    /// Decomposition depth
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Number of bands produced per signal
    pub fn band_count(&self) -> usize {
        self.levels + 1
    }

    /// Band lengths a signal of `signal_len` samples decomposes into
    pub fn band_lengths(&self, signal_len: usize) -> Vec<usize> {
        let filter_len = self.basis.filter_len();
        let mut detail_lengths = Vec::with_capacity(self.levels);
        let mut current = signal_len;
        for _ in 0..self.levels {
            current = (current + filter_len - 1) / 2;
            detail_lengths.push(current);
        }
        let mut lengths = Vec::with_capacity(self.levels + 1);
        lengths.push(current);
        lengths.extend(detail_lengths.into_iter().rev());
        lengths
    }

    /// Decompose `samples` into `[cA_L, cD_L, cD_(L-1), ..., cD_1]`
    pub fn decompose(&self, samples: &[f64]) -> Result<Vec<CoefficientBand>, FeatureError> {
        if samples.is_empty() {
            return Err(FeatureError::EmptySignal);
        }

        let useful = max_useful_level(samples.len(), self.basis.filter_len());
        if self.levels > useful {
            debug!(
                "Decomposing {} samples with {} to level {} (useful maximum {})",
                samples.len(),
                self.basis,
                self.levels,
                useful
            );
        }

        let dec_lo = self.basis.dec_lo();
        let mut details = Vec::with_capacity(self.levels);
        let mut approx = samples.to_vec();

        for level in 1..=self.levels {
            let (next, detail) = dwt_step(&approx, dec_lo, &self.dec_hi);
            details.push(CoefficientBand {
                kind: BandKind::Detail { level },
                coefficients: detail,
            });
            approx = next;
        }

        let mut bands = Vec::with_capacity(self.levels + 1);
        bands.push(CoefficientBand {
            kind: BandKind::Approximation { level: self.levels },
            coefficients: approx,
        });
        bands.extend(details.into_iter().rev());
        Ok(bands)
    }
}

/// Map an extended index back into `0..n` by half-sample symmetric reflection
fn symmetric_index(idx: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = idx.rem_euclid(period) as usize;
    if m < n {
        m
    } else {
        2 * n - 1 - m
    }
}

/// One analysis level: returns (approximation, detail)
fn dwt_step(x: &[f64], dec_lo: &[f64], dec_hi: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len();
    let filter_len = dec_lo.len();
    let out_len = (n + filter_len - 1) / 2;

    let mut approx = Vec::with_capacity(out_len);
    let mut detail = Vec::with_capacity(out_len);

    for o in 0..out_len {
        let i = (2 * o + 1) as isize;
        let mut a = 0.0;
        let mut d = 0.0;
        for j in 0..filter_len {
            let v = x[symmetric_index(i - j as isize, n)];
            a += dec_lo[j] * v;
            d += dec_hi[j] * v;
        }
        approx.push(a);
        detail.push(d);
    }

    (approx, detail)
}
