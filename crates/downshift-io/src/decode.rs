//! Decoded audio as it comes out of a container.

use crate::error::Result;
use downshift_core::{SampleBuffer, SampleData};

/// Samples exactly as stored in the file, before any scaling.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub data: SampleData,
    pub channels: usize,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.data.len() / self.channels
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Convert to a float buffer in `[-1, 1)`.
    ///
    /// Integer PCM is divided by full scale, `2^(bits - 1)`.
    pub fn into_buffer(self) -> Result<SampleBuffer> {
        let scale = 1.0 / (1u64 << self.bits_per_sample.saturating_sub(1)) as f64;

        let data = match self.data {
            SampleData::I16(samples) => {
                SampleData::F64(samples.into_iter().map(|s| s as f64 * scale).collect())
            }
            SampleData::I32(samples) => {
                SampleData::F64(samples.into_iter().map(|s| s as f64 * scale).collect())
            }
            float => float,
        };

        Ok(SampleBuffer::from_data(data, self.channels)?)
    }
}
