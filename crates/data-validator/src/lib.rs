//! Data Validation and Auditing
//!
//! Provides per-signal validation ahead of feature extraction, plus dataset
//! audits: sampling-rate census, signal length statistics, and per-record
//! validation reports.

mod audit;
mod error;
mod report;
mod validator;

pub use audit::{collect_lengths, LengthStatistics, SamplingRateCensus};
pub use error::ValidationError;
pub use report::{ValidationEntry, ValidationReport};
pub use validator::{SignalValidator, ValidationConfig};
