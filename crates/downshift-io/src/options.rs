//! Output options.

use crate::error::IoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Audio container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Wav,
    Flac,
}

impl AudioFormat {
    /// File extension (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
        }
    }

    /// Guess the container from a path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "wav" | "wave" => Ok(AudioFormat::Wav),
            "flac" => Ok(AudioFormat::Flac),
            _ => Err(IoError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    #[default]
    Int16,
    Int24,
    Float32,
}

impl BitDepth {
    /// Bits per sample.
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::Int16 => 16,
            BitDepth::Int24 => 24,
            BitDepth::Float32 => 32,
        }
    }

    /// Largest integer code, used to scale `[-1, 1]` floats.
    pub(crate) fn full_scale(&self) -> f64 {
        match self {
            BitDepth::Int16 => 32767.0,
            BitDepth::Int24 => 8388607.0,
            BitDepth::Float32 => 1.0,
        }
    }
}

/// FLAC encoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacOptions {
    /// Samples per block.
    pub block_size: usize,
}

impl Default for FlacOptions {
    fn default() -> Self {
        Self { block_size: 4096 }
    }
}

/// How a transformed buffer is written to disk.
///
/// Integer depths clamp samples to `[-1, 1]` first. Output is 16-bit PCM
/// unless told otherwise, whatever the input depth was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub format: AudioFormat,
    pub bit_depth: BitDepth,
    pub flac: FlacOptions,
}

impl WriteOptions {
    pub fn new(format: AudioFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }
}

/// Convert a float sample to an integer code with clipping.
#[inline]
pub(crate) fn float_to_int(sample: f64, bit_depth: BitDepth) -> i32 {
    (sample.clamp(-1.0, 1.0) * bit_depth.full_scale()).round() as i32
}
