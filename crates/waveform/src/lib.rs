//! Seismic Waveform Model
//!
//! Provides the signal and label types shared across the pipeline, plus the
//! `SignalSource` seam through which recordings are fetched.

mod error;
mod record;
mod signal;
mod source;

pub use error::SignalReadError;
pub use record::{ArrivalTime, LabeledRecord};
pub use signal::Signal;
pub use source::{JsonWaveformSource, MemorySignalSource, SignalSource, WaveformDocument};
