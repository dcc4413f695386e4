//! # Spectradownshift - Reversible Spectral Downshift
//!
//! Prepares recordings for slow-speed production steps (half-speed
//! mastering, cutting at reduced speed) and restores them afterwards.
//!
//! ## Architecture
//!
//! Spectradownshift is an umbrella crate that coordinates:
//! - **downshift-core** - The transform kernel (prepare, restore, resampler backends, anti-alias filter)
//! - **downshift-io** - Container I/O (WAV decode/encode, FLAC encode)
//! - **downshift-batch** - Batch driver (progress events, cancellation, profile store)
//!
//! ## Quick Start
//!
//! ```ignore
//! use spectradownshift::prelude::*;
//!
//! let decoded = read_audio("take.wav".as_ref())?;
//! let ctx = TransformContext::new(decoded.sample_rate, 17000.0)?;
//!
//! let prepared = prepare(decoded.into_buffer()?, &ctx, Engine::Precision)?;
//! write_audio("take_prepared.wav".as_ref(), &prepared, &WriteOptions::default())?;
//! ```
//!
//! ## Feature Flags
//!
//! - `default` / `full` - Everything enabled
//! - `precision` - Fourier resampler
//! - `fast` - Windowed-sinc resampler
//! - `filter` - Zero-phase anti-alias filter
//! - `wav`, `flac` - Container codecs
//! - `batch` - Batch driver and profile store

/// Re-export of downshift-core for direct access
pub use downshift_core as core;

// Kernel types
pub use downshift_core::{
    apply_low_pass, prepare, resample, restore, AntiAliasFilter, BackendRegistry, Downshifter,
    Engine, Mode, ResamplerBackend, SampleBuffer, SampleData, TaggedBuffer, TransformContext,
    DEFAULT_CUTOFF_HZ, DEFAULT_PASSES,
};

// Container I/O
#[cfg(feature = "io")]
pub use downshift_io as io;

#[cfg(feature = "io")]
pub use downshift_io::{
    encode_audio, read_audio, write_audio, AudioFormat, BitDepth, DecodedAudio, WriteOptions,
};

// Batch processing
#[cfg(feature = "batch")]
pub use downshift_batch as batch;

#[cfg(feature = "batch")]
pub use downshift_batch::{
    collect_inputs, run_batch, BatchEvent, BatchHandle, BatchReport, CancellationToken,
    JobSettings, Profile, ProfileStore,
};

mod error;

pub use error::{Error, Result};

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::{
        prepare, restore, Downshifter, Engine, Mode, SampleBuffer, TaggedBuffer,
        TransformContext, DEFAULT_CUTOFF_HZ,
    };

    #[cfg(feature = "io")]
    pub use crate::{read_audio, write_audio, AudioFormat, BitDepth, WriteOptions};

    #[cfg(feature = "batch")]
    pub use crate::{
        collect_inputs, BatchEvent, BatchHandle, CancellationToken, JobSettings, ProfileStore,
    };

    pub use crate::{Error, Result};
}
