//! Sample buffers handed between transform stages.
//!
//! A [`SampleBuffer`] only carries samples and a channel count. It has no
//! notion of speed: the rate it should be played at travels next to it, as a
//! [`TaggedBuffer`] once a transform has produced it.

use crate::error::{Error, Result};

/// Raw sample payload as delivered by a decoder.
///
/// Only the floating-point variants are accepted by the kernel. Integer PCM
/// has to be scaled to float by the caller first.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    F32(Vec<f32>),
    F64(Vec<f64>),
    I16(Vec<i16>),
    I32(Vec<i32>),
}

impl SampleData {
    /// Number of interleaved samples.
    pub fn len(&self) -> usize {
        match self {
            SampleData::F32(s) => s.len(),
            SampleData::F64(s) => s.len(),
            SampleData::I16(s) => s.len(),
            SampleData::I32(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the payload holds floating-point samples.
    pub fn is_float(&self) -> bool {
        matches!(self, SampleData::F32(_) | SampleData::F64(_))
    }

    fn type_name(&self) -> &'static str {
        match self {
            SampleData::F32(_) => "f32",
            SampleData::F64(_) => "f64",
            SampleData::I16(_) => "i16",
            SampleData::I32(_) => "i32",
        }
    }
}

/// Interleaved floating-point audio, exclusively owned by one stage at a time.
///
/// Invariants: at least one frame, at least one channel, the sample count is
/// a multiple of the channel count, and every sample is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    channels: usize,
}

impl SampleBuffer {
    /// Create a buffer from interleaved samples.
    pub fn new(samples: Vec<f64>, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidInput("channel count must be at least 1".into()));
        }
        if samples.is_empty() {
            return Err(Error::InvalidInput("sample buffer is empty".into()));
        }
        if samples.len() % channels != 0 {
            return Err(Error::InvalidInput(format!(
                "{} samples cannot be split into {} channels",
                samples.len(),
                channels
            )));
        }
        if let Some(pos) = samples.iter().position(|s| !s.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "non-finite sample at index {}",
                pos
            )));
        }

        Ok(Self { samples, channels })
    }

    /// Create a single-channel buffer.
    pub fn mono(samples: Vec<f64>) -> Result<Self> {
        Self::new(samples, 1)
    }

    /// Create a buffer from one vector per channel.
    pub fn from_planar(planar: Vec<Vec<f64>>) -> Result<Self> {
        let channels = planar.len();
        if channels == 0 {
            return Err(Error::InvalidInput("channel count must be at least 1".into()));
        }

        let frames = planar[0].len();
        if planar.iter().any(|c| c.len() != frames) {
            return Err(Error::InvalidInput(
                "channels have different lengths".into(),
            ));
        }

        let mut samples = Vec::with_capacity(frames * channels);
        for frame in 0..frames {
            for channel in &planar {
                samples.push(channel[frame]);
            }
        }

        Self::new(samples, channels)
    }

    /// Create a buffer from a decoder payload, rejecting integer samples.
    pub fn from_data(data: SampleData, channels: usize) -> Result<Self> {
        match data {
            SampleData::F64(samples) => Self::new(samples, channels),
            SampleData::F32(samples) => {
                Self::new(samples.into_iter().map(f64::from).collect(), channels)
            }
            other => Err(Error::InvalidInput(format!(
                "expected floating-point samples, got {}",
                other.type_name()
            ))),
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Total interleaved samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed buffer.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Copy of a single channel.
    pub fn channel(&self, index: usize) -> Vec<f64> {
        self.samples
            .iter()
            .skip(index)
            .step_by(self.channels)
            .copied()
            .collect()
    }

    /// De-interleave into one vector per channel.
    pub fn to_planar(&self) -> Vec<Vec<f64>> {
        (0..self.channels).map(|c| self.channel(c)).collect()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()))
    }
}

impl TryFrom<SampleData> for SampleBuffer {
    type Error = Error;

    /// Interprets the payload as mono.
    fn try_from(data: SampleData) -> Result<Self> {
        Self::from_data(data, 1)
    }
}

/// A buffer together with the sample rate it must be played back at.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedBuffer {
    pub buffer: SampleBuffer,
    pub sample_rate: u32,
}

impl TaggedBuffer {
    pub fn new(buffer: SampleBuffer, sample_rate: u32) -> Self {
        Self {
            buffer,
            sample_rate,
        }
    }

    /// Playback duration at the tagged rate.
    pub fn duration_seconds(&self) -> f64 {
        self.buffer.frames() as f64 / self.sample_rate as f64
    }

    pub fn into_parts(self) -> (SampleBuffer, u32) {
        (self.buffer, self.sample_rate)
    }
}
