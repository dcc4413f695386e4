//! Centralized error type for the spectradownshift umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Kernel(#[from] downshift_core::Error),

    #[cfg(feature = "io")]
    #[error("Audio file: {0}")]
    Audio(#[from] downshift_io::IoError),

    #[cfg(feature = "batch")]
    #[error("Batch: {0}")]
    Batch(#[from] downshift_batch::BatchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
