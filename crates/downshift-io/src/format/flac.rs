//! FLAC encoding with flacenc and decoding with claxon
//!
//! Encodes 16-bit and 24-bit audio. Decodes any integer depth claxon reads.

use crate::decode::DecodedAudio;
use crate::error::{IoError, Result};
use crate::options::{float_to_int, BitDepth};
use claxon::FlacReader;
use downshift_core::SampleData;
use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config::Encoder as EncoderConfig;
use flacenc::encode_with_fixed_block_size;
use flacenc::error::Verify;
use flacenc::source::MemSource;
use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

/// FLAC encoder configuration
#[derive(Debug, Clone)]
pub struct FlacConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bit depth (16 or 24, 32-bit float not supported)
    pub bit_depth: BitDepth,
    /// Number of interleaved channels
    pub channels: u16,
    /// Block size (samples per block, affects compression efficiency)
    pub block_size: usize,
}

impl Default for FlacConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: BitDepth::Int16,
            channels: 2,
            block_size: 4096,
        }
    }
}

impl FlacConfig {
    pub fn new(sample_rate: u32, bit_depth: BitDepth, channels: u16) -> Self {
        Self {
            sample_rate,
            bit_depth,
            channels,
            ..Default::default()
        }
    }

    /// Set block size
    pub fn with_block_size(mut self, size: usize) -> Self {
        self.block_size = size;
        self
    }
}

/// Decode a FLAC file.
pub fn read_flac(path: &Path) -> Result<DecodedAudio> {
    decode(FlacReader::open(path)?)
}

/// Decode FLAC bytes held in memory.
pub fn decode_flac_memory(bytes: &[u8]) -> Result<DecodedAudio> {
    decode(FlacReader::new(Cursor::new(bytes))?)
}

fn decode<R: Read>(mut reader: FlacReader<R>) -> Result<DecodedAudio> {
    let info = reader.streaminfo();
    if info.bits_per_sample > 32 {
        return Err(IoError::UnsupportedFormat(format!(
            "FLAC with {} bits per sample",
            info.bits_per_sample
        )));
    }

    let samples = reader
        .samples()
        .collect::<std::result::Result<Vec<i32>, _>>()?;

    // Samples arrive right-aligned at their stored depth
    let data = if info.bits_per_sample <= 16 {
        SampleData::I16(samples.into_iter().map(|s| s as i16).collect())
    } else {
        SampleData::I32(samples)
    };

    Ok(DecodedAudio {
        data,
        channels: info.channels as usize,
        sample_rate: info.sample_rate,
        bits_per_sample: info.bits_per_sample as u16,
    })
}

/// Encode interleaved audio to a FLAC file
pub fn encode_flac_file(samples: &[f64], path: &Path, config: &FlacConfig) -> Result<()> {
    let flac_data = encode_flac_memory(samples, config)?;

    let mut file = File::create(path)?;
    file.write_all(&flac_data)?;

    Ok(())
}

/// Encode interleaved audio to FLAC in memory
pub fn encode_flac_memory(samples: &[f64], config: &FlacConfig) -> Result<Vec<u8>> {
    if config.channels == 0 || samples.len() % config.channels as usize != 0 {
        return Err(IoError::InvalidData(format!(
            "{} samples do not fill {} channels",
            samples.len(),
            config.channels
        )));
    }

    // FLAC doesn't support 32-bit float
    if config.bit_depth == BitDepth::Float32 {
        return Err(IoError::UnsupportedFormat(
            "FLAC does not support 32-bit float, use 16-bit or 24-bit".into(),
        ));
    }

    let int_samples: Vec<i32> = samples
        .iter()
        .map(|&s| float_to_int(s, config.bit_depth))
        .collect();

    let encoder_config = EncoderConfig::default()
        .into_verified()
        .map_err(|e| IoError::Encoding(format!("Invalid FLAC config: {:?}", e)))?;

    let source = MemSource::from_samples(
        &int_samples,
        config.channels as usize,
        config.bit_depth.bits() as usize,
        config.sample_rate as usize,
    );

    let stream = encode_with_fixed_block_size(&encoder_config, source, config.block_size)
        .map_err(|e| IoError::Encoding(format!("FLAC encoding failed: {:?}", e)))?;

    let mut sink = ByteSink::new();
    stream
        .write(&mut sink)
        .map_err(|e| IoError::Encoding(format!("Failed to write FLAC stream: {:?}", e)))?;

    Ok(sink.into_inner())
}
