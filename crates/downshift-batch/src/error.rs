//! Error types for downshift-batch

use thiserror::Error;

/// Batch error type
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Transform error: {0}")]
    Kernel(#[from] downshift_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio file error: {0}")]
    Audio(#[from] downshift_io::IoError),

    #[error("Profile store error: {0}")]
    Profile(#[from] serde_json::Error),

    /// Inputs or output folder that cannot be processed
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Batch worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, BatchError>;
