//! WAV decoding and encoding using hound
//!
//! Reads 8/16/24/32-bit integer and 32-bit float files. Writes 16-bit,
//! 24-bit and 32-bit float.

use crate::decode::DecodedAudio;
use crate::error::{IoError, Result};
use crate::options::{float_to_int, BitDepth};
use downshift_core::SampleData;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

/// WAV encoder configuration
#[derive(Debug, Clone)]
pub struct WavConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bit depth
    pub bit_depth: BitDepth,
    /// Number of interleaved channels
    pub channels: u16,
}

impl Default for WavConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bit_depth: BitDepth::Int16,
            channels: 2,
        }
    }
}

impl WavConfig {
    pub fn new(sample_rate: u32, bit_depth: BitDepth, channels: u16) -> Self {
        Self {
            sample_rate,
            bit_depth,
            channels,
        }
    }
}

/// Decode a WAV file.
pub fn read_wav(path: &Path) -> Result<DecodedAudio> {
    decode(WavReader::open(path)?)
}

/// Decode WAV bytes held in memory.
pub fn decode_wav_memory(bytes: &[u8]) -> Result<DecodedAudio> {
    decode(WavReader::new(Cursor::new(bytes))?)
}

fn decode<R: Read>(reader: WavReader<R>) -> Result<DecodedAudio> {
    let spec = reader.spec();

    let data = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => SampleData::F32(
            reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()?,
        ),
        (SampleFormat::Int, 1..=16) => SampleData::I16(
            reader
                .into_samples::<i16>()
                .collect::<std::result::Result<_, _>>()?,
        ),
        (SampleFormat::Int, 17..=32) => SampleData::I32(
            reader
                .into_samples::<i32>()
                .collect::<std::result::Result<_, _>>()?,
        ),
        (format, bits) => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} WAV with {} bits per sample",
                format, bits
            )))
        }
    };

    Ok(DecodedAudio {
        data,
        channels: spec.channels as usize,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
    })
}

/// Encode interleaved audio to a WAV file
///
/// # Arguments
/// * `samples` - Interleaved samples (normalized -1.0 to 1.0)
/// * `path` - Output file path
/// * `config` - WAV configuration
pub fn encode_wav_file(samples: &[f64], path: &Path, config: &WavConfig) -> Result<()> {
    check_layout(samples, config)?;

    let mut writer = WavWriter::create(path, create_wav_spec(config))?;
    write_samples(&mut writer, samples, config.bit_depth)?;
    writer.finalize()?;

    Ok(())
}

/// Encode interleaved audio to WAV in memory
///
/// # Returns
/// WAV file bytes
pub fn encode_wav_memory(samples: &[f64], config: &WavConfig) -> Result<Vec<u8>> {
    check_layout(samples, config)?;

    let mut buffer = Vec::new();
    {
        let cursor = Cursor::new(&mut buffer);
        let mut writer = WavWriter::new(cursor, create_wav_spec(config))?;

        write_samples(&mut writer, samples, config.bit_depth)?;

        // Finalize writes the header and flushes
        writer.finalize()?;
    }

    Ok(buffer)
}

fn check_layout(samples: &[f64], config: &WavConfig) -> Result<()> {
    if config.channels == 0 || samples.len() % config.channels as usize != 0 {
        return Err(IoError::InvalidData(format!(
            "{} samples do not fill {} channels",
            samples.len(),
            config.channels
        )));
    }
    Ok(())
}

/// Create hound WavSpec from our config
fn create_wav_spec(config: &WavConfig) -> WavSpec {
    let sample_format = match config.bit_depth {
        BitDepth::Float32 => SampleFormat::Float,
        BitDepth::Int16 | BitDepth::Int24 => SampleFormat::Int,
    };

    WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: config.bit_depth.bits(),
        sample_format,
    }
}

fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    samples: &[f64],
    bit_depth: BitDepth,
) -> Result<()> {
    match bit_depth {
        BitDepth::Int16 => {
            for &sample in samples {
                writer.write_sample(float_to_int(sample, bit_depth) as i16)?;
            }
        }
        BitDepth::Int24 => {
            for &sample in samples {
                writer.write_sample(float_to_int(sample, bit_depth))?;
            }
        }
        BitDepth::Float32 => {
            for &sample in samples {
                writer.write_sample(sample as f32)?;
            }
        }
    }

    Ok(())
}
