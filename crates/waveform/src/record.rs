//! Labeled Records and Arrival Times

use crate::Signal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Arrival time of the labeled phase
///
/// Label tables store either absolute timestamps or offsets that are already
/// relative to the recording start. The variant records which one is in play.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArrivalTime {
    /// Absolute UTC timestamp
    Absolute(DateTime<Utc>),
    /// Seconds since the first sample of the recording
    Relative(f64),
}

impl ArrivalTime {
    /// Build an absolute arrival from fractional Unix epoch seconds
    pub fn from_epoch_seconds(secs: f64) -> Option<Self> {
        if !secs.is_finite() {
            return None;
        }
        let mut whole = secs.floor();
        let mut nanos = ((secs - whole) * 1e9).round();
        if nanos >= 1e9 {
            whole += 1.0;
            nanos = 0.0;
        }
        DateTime::from_timestamp(whole as i64, nanos as u32).map(ArrivalTime::Absolute)
    }

    /// Arrival expressed in seconds from the start of `signal`
    ///
    /// Relative arrivals pass through unchanged.
    pub fn relative_to(&self, signal: &Signal) -> f64 {
        match self {
            ArrivalTime::Relative(secs) => *secs,
            ArrivalTime::Absolute(at) => {
                let delta = *at - signal.start_time();
                delta
                    .num_nanoseconds()
                    .map(|ns| ns as f64 / 1e9)
                    .unwrap_or_else(|| delta.num_milliseconds() as f64 / 1e3)
            }
        }
    }

    /// Check if no conversion against a signal is needed
    pub fn is_relative(&self) -> bool {
        matches!(self, ArrivalTime::Relative(_))
    }
}

/// A recording identifier joined with its labeled arrival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    /// Identifier passed to the signal source
    pub identifier: String,
    /// Labeled arrival
    pub arrival: ArrivalTime,
}

impl LabeledRecord {
    /// Create a record with an absolute arrival
    pub fn absolute(identifier: impl Into<String>, arrival: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            arrival: ArrivalTime::Absolute(arrival),
        }
    }

    /// Create a record whose arrival is already relative to the recording start
    pub fn relative(identifier: impl Into<String>, arrival_secs: f64) -> Self {
        Self {
            identifier: identifier.into(),
            arrival: ArrivalTime::Relative(arrival_secs),
        }
    }
}
