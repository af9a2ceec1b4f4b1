//! Signal Read Error Types

use thiserror::Error;

/// Errors that can occur while fetching a waveform from a source
#[derive(Debug, Clone, Error)]
pub enum SignalReadError {
    /// No recording exists for the identifier
    #[error("No waveform found for {0}")]
    NotFound(String),

    /// Identifier cannot name a file inside the source root
    #[error("Invalid waveform identifier {0:?}")]
    InvalidIdentifier(String),

    /// Underlying I/O failure
    #[error("I/O error reading {identifier}: {message}")]
    Io { identifier: String, message: String },

    /// Recording exists but could not be decoded
    #[error("Malformed waveform {identifier}: {message}")]
    Malformed { identifier: String, message: String },
}

impl SignalReadError {
    /// Identifier of the recording that failed
    pub fn identifier(&self) -> &str {
        match self {
            SignalReadError::NotFound(id) => id,
            SignalReadError::InvalidIdentifier(id) => id,
            SignalReadError::Io { identifier, .. } => identifier,
            SignalReadError::Malformed { identifier, .. } => identifier,
        }
    }
}
