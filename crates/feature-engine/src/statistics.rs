//! Statistical Features Computation

use serde::{Deserialize, Serialize};

/// Number of statistics computed per coefficient band
pub const STATS_PER_BAND: usize = 12;

/// Column suffixes, in output order
pub const STATISTIC_NAMES: [&str; STATS_PER_BAND] = [
    "mean",
    "std",
    "skew",
    "kurtosis",
    "p75",
    "p25",
    "max",
    "min",
    "l1_norm",
    "l2_norm",
    "entropy",
    "median_abs",
];

/// Standard deviations at or below `resolution * |mean|` count as zero spread
const DEGENERATE_RESOLUTION: f64 = 1e-15;

/// Statistical summary of one coefficient band
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BandStatistics {
    /// Mean value
    pub mean: f64,
    /// Population standard deviation (ddof = 0)
    pub std_dev: f64,
    /// Skewness (biased, m3 / m2^1.5)
    pub skewness: f64,
    /// Excess kurtosis (biased, m4 / m2^2 - 3)
    pub kurtosis: f64,
    /// 75th percentile
    pub p75: f64,
    /// 25th percentile
    pub p25: f64,
    /// Maximum value
    pub max: f64,
    /// Minimum value
    pub min: f64,
    /// Sum of absolute values
    pub l1_norm: f64,
    /// Euclidean norm
    pub l2_norm: f64,
    /// Shannon entropy (nats) of the normalized absolute values
    pub entropy: f64,
    /// Median of absolute values
    pub median_abs: f64,
}

impl BandStatistics {
    /// Compute the summary of a slice of coefficients
    ///
    /// Spread moments of a flat band are reported as 0 rather than NaN.
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;

        // Work in units of the largest magnitude so sums cannot overflow
        let peak = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let unit = if peak > 0.0 && peak.is_finite() { peak } else { 1.0 };
        let scaled: Vec<f64> = values.iter().map(|v| v / unit).collect();

        // Mean
        let scaled_mean = scaled.iter().sum::<f64>() / n;
        let mean = scaled_mean * unit;

        // Min/Max
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let (std_dev, skewness, kurtosis) = if max == min {
            (0.0, 0.0, 0.0)
        } else {
            spread_moments(&scaled, scaled_mean, unit, mean)
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut magnitudes: Vec<f64> = scaled.iter().map(|v| v.abs()).collect();
        let scaled_l1: f64 = magnitudes.iter().sum();
        let l1_norm = scaled_l1 * unit;
        let l2_norm = scaled.iter().map(|v| v * v).sum::<f64>().sqrt() * unit;
        let entropy = shannon_entropy(&magnitudes, scaled_l1);
        magnitudes.sort_by(f64::total_cmp);

        Self {
            mean,
            std_dev,
            skewness,
            kurtosis,
            p75: percentile_sorted(&sorted, 75.0),
            p25: percentile_sorted(&sorted, 25.0),
            max,
            min,
            l1_norm,
            l2_norm,
            entropy,
            median_abs: percentile_sorted(&magnitudes, 50.0) * unit,
        }
    }

    /// Values in [`STATISTIC_NAMES`] order
    pub fn to_array(&self) -> [f64; STATS_PER_BAND] {
        [
            self.mean,
            self.std_dev,
            self.skewness,
            self.kurtosis,
            self.p75,
            self.p25,
            self.max,
            self.min,
            self.l1_norm,
            self.l2_norm,
            self.entropy,
            self.median_abs,
        ]
    }
}

/// Summarize a band into its fixed-order 12-value vector
pub fn summarize(values: &[f64]) -> [f64; STATS_PER_BAND] {
    BandStatistics::compute(values).to_array()
}

/// Standard deviation, skewness and excess kurtosis of a non-flat band
///
/// Deviations are normalized by their largest magnitude, so the standardized
/// ratios stay finite for subnormal and near-overflow inputs. A spread below
/// `DEGENERATE_RESOLUTION * |mean|` counts as zero.
fn spread_moments(scaled: &[f64], scaled_mean: f64, unit: f64, mean: f64) -> (f64, f64, f64) {
    let n = scaled.len() as f64;
    let deviations: Vec<f64> = scaled.iter().map(|v| v - scaled_mean).collect();
    let spread = deviations.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    if spread <= 0.0 || !spread.is_finite() {
        return (0.0, 0.0, 0.0);
    }

    let mut m2 = 0.0;
    let mut m3 = 0.0;
    let mut m4 = 0.0;
    for d in &deviations {
        let e = d / spread;
        let e2 = e * e;
        m2 += e2;
        m3 += e2 * e;
        m4 += e2 * e2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    let std_dev = m2.sqrt() * spread * unit;
    if std_dev <= DEGENERATE_RESOLUTION * mean.abs() {
        return (0.0, 0.0, 0.0);
    }

    let skewness = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2) - 3.0;
    if !(std_dev.is_finite() && skewness.is_finite() && kurtosis.is_finite()) {
        return (0.0, 0.0, 0.0);
    }
    (std_dev, skewness, kurtosis)
}

/// Linear interpolation between closest ranks; `sorted` must be ascending
pub fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let rank = pct / 100.0 * (len - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let frac = rank - lower as f64;
            let (a, b) = (sorted[lower], sorted[upper]);
            if frac == 0.0 {
                return a;
            }
            let value = a + (b - a) * frac;
            if value.is_finite() {
                value
            } else {
                a * (1.0 - frac) + b * frac
            }
        }
    }
}

/// Entropy of `magnitudes / total`, natural log
///
/// Zero entries contribute nothing (0 ln 0 = 0). An all-zero band has
/// entropy 0.
fn shannon_entropy(magnitudes: &[f64], total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    magnitudes
        .iter()
        .filter(|&&m| m > 0.0)
        .map(|&m| {
            let p = m / total;
            -p * p.ln()
        })
        .sum()
}
