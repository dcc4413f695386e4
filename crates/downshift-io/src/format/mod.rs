//! Container codecs
//!
//! Each codec is feature-gated:
//! - `wav`: WAV decode and encode via hound (pure Rust)
//! - `flac`: FLAC encode via flacenc, decode via claxon (pure Rust)

#[cfg(feature = "wav")]
pub mod wav;

#[cfg(feature = "flac")]
pub mod flac;
