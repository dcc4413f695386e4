//! # Downshift Core
//!
//! Reversible spectral downshift kernel.
//!
//! `prepare` stretches a recording by `R / 2C` and compresses its spectrum
//! below the cutoff `C`, for slow-speed production steps such as half-speed
//! mastering. `restore` undoes it. Both operate on fully materialized buffers
//! and return the buffer together with the rate it must be played back at.
//!
//! ```ignore
//! use downshift_core::{Downshifter, Engine, SampleBuffer, TransformContext};
//!
//! let ctx = TransformContext::new(44100, 17000.0)?;
//! let shifter = Downshifter::new();
//!
//! let prepared = shifter.prepare(buffer, &ctx, Engine::Precision)?;
//! let restored = shifter.restore(prepared.buffer, &ctx, Engine::Precision)?;
//! ```
//!
//! ## Feature Flags
//!
//! - `precision` (default): whole-buffer Fourier resampler via rustfft
//! - `fast` (default): windowed-sinc resampler via rubato
//! - `filter` (default): zero-phase Butterworth anti-alias filter

pub mod buffer;
pub mod context;
pub mod error;
pub mod filter;
pub mod resample;
mod transform;

pub use buffer::{SampleBuffer, SampleData, TaggedBuffer};
pub use context::{Engine, Mode, TransformContext, DEFAULT_CUTOFF_HZ};
pub use error::{Error, Result};
pub use filter::{apply_low_pass, AntiAliasFilter, DEFAULT_PASSES};
pub use resample::{resample, BackendRegistry, ResamplerBackend};
pub use transform::{prepare, restore, Downshifter};
