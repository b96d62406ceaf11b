//! Error types for the wsola crate.

use std::fmt;

/// Errors that can occur at the crate boundary.
///
/// The WSOLA core itself never fails: out-of-range parameters are clamped
/// (and reported via [`crate::stretch::params::Adjustments`]) and degenerate
/// inputs under-produce output. Errors arise only from invalid top-level
/// arguments and from WAV I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsmError {
    /// Stretch ratio must be positive and finite.
    InvalidRatio(String),
    /// Input contained NaN or infinite samples.
    NonFiniteInput,
    /// Malformed WAV data.
    InvalidFormat(String),
    /// I/O error.
    IoError(String),
}

impl fmt::Display for TsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsmError::InvalidRatio(msg) => write!(f, "invalid stretch ratio: {}", msg),
            TsmError::NonFiniteInput => write!(f, "input contains NaN or infinite samples"),
            TsmError::InvalidFormat(msg) => write!(f, "invalid format: {}", msg),
            TsmError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TsmError {}

impl From<std::io::Error> for TsmError {
    fn from(err: std::io::Error) -> Self {
        TsmError::IoError(err.to_string())
    }
}
