//! Error types for downshift-core

use thiserror::Error;

/// Kernel error type.
///
/// Every failure is raised where it is detected and handed to the caller
/// untouched. The kernel never retries and never falls back to another engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed buffer or parameters (empty buffer, integer samples, bad rates)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cutoff frequency is zero, negative or not finite
    #[error("Invalid cutoff: {0} Hz (must be a positive frequency)")]
    InvalidCutoff(f64),

    /// The requested numeric backend is not present in this build
    #[error("Engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The resampler selector is not one the kernel knows
    #[error("Unsupported resampler engine: {0}")]
    UnsupportedEngine(String),

    /// The backend library rejected construction or processing
    #[error("Resampling error: {0}")]
    Resample(String),
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, Error>;

// Backend library errors are flattened to strings at the API boundary

#[cfg(feature = "fast")]
impl From<rubato::ResamplerConstructionError> for Error {
    fn from(e: rubato::ResamplerConstructionError) -> Self {
        Error::Resample(e.to_string())
    }
}

#[cfg(feature = "fast")]
impl From<rubato::ResampleError> for Error {
    fn from(e: rubato::ResampleError) -> Self {
        Error::Resample(e.to_string())
    }
}
