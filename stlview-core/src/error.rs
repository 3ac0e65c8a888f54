/// Error types for the STL viewer core
///
/// Every fallible operation reports one of these synchronously. Parameters
/// are checked before any scene state is touched, so an error never leaves
/// the scene half-transformed.
use std::path::PathBuf;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed ASCII STL structure
    #[error("Malformed STL at line {line}: {reason}")]
    Format {
        /// 1-based line number, 0 when detected at end of input
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// STL or config file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Path that failed to open or read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid numeric parameter
    #[error("Invalid parameter: {0}")]
    Domain(String),

    /// Configuration file did not deserialize
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Snapshot could not be encoded or written
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        Self::Domain(reason.into())
    }
}

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, Error>;

/// Reject NaN and infinities in a named parameter
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::domain(format!("{name} must be finite, got {value}")))
    }
}
