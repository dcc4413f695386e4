//! Error types for downshift-io

use std::io;
use thiserror::Error;

/// Container I/O error type
#[derive(Error, Debug)]
pub enum IoError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported container, sample format, or feature not enabled
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Malformed file or samples that cannot be written
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// Decoded samples rejected by the kernel
    #[error(transparent)]
    Kernel(#[from] downshift_core::Error),
}

/// Result type for container I/O
pub type Result<T> = std::result::Result<T, IoError>;

#[cfg(feature = "wav")]
impl From<hound::Error> for IoError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(e) => IoError::Io(e),
            hound::Error::Unsupported => {
                IoError::UnsupportedFormat("WAV variant not supported".into())
            }
            other => IoError::InvalidData(other.to_string()),
        }
    }
}

#[cfg(feature = "flac")]
impl From<claxon::Error> for IoError {
    fn from(e: claxon::Error) -> Self {
        match e {
            claxon::Error::IoError(e) => IoError::Io(e),
            claxon::Error::Unsupported(what) => IoError::UnsupportedFormat(what.into()),
            claxon::Error::FormatError(what) => IoError::InvalidData(what.into()),
        }
    }
}
