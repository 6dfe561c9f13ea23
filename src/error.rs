//! Error type shared by every module of the crate.

use std::path::PathBuf;

/// Errors raised while configuring or running the elimination GA.
///
/// None of these are retried: each one means either bad input or a broken
/// internal invariant. Normal termination causes (stall, exhausted budget)
/// are reported through [`crate::ga::Termination`], not here.
#[derive(Debug, thiserror::Error)]
pub enum GaError {
    /// Invalid construction parameter (sizes, bounds, probabilities).
    #[error("ConfigError: {0}")]
    Config(String),

    /// The dataset source could not be read.
    #[error("IoError: cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset source was readable but malformed.
    ///
    /// Kept apart from [`GaError::Io`] to carry the line number; both are
    /// dataset errors (see [`GaError::is_io`]) and print as `IoError`.
    #[error("IoError: line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Two gene vectors that must agree in length do not.
    #[error("DimensionMismatchError: expected {expected} genes, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// An operation was called out of sequence.
    #[error("StateError: {0}")]
    State(&'static str),

    /// Gene or slot index outside `[0, len)`.
    #[error("IndexError: index {index} out of range for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

impl GaError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    pub(crate) fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    /// Returns `true` for errors caused by the dataset source.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Parse { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaError>;
