//! # Downshift I/O
//!
//! Container I/O around the downshift kernel. Decoding hands back samples
//! as stored; [`DecodedAudio::into_buffer`] does the integer to float scaling
//! the kernel expects. Encoding writes a [`TaggedBuffer`] at its tagged rate.
//!
//! ```ignore
//! use downshift_io::{read_audio, write_audio, AudioFormat, WriteOptions};
//!
//! let decoded = read_audio("take.wav".as_ref())?;
//! let rate = decoded.sample_rate;
//! let buffer = decoded.into_buffer()?;
//! // ... transform ...
//! write_audio("take_prepared.flac".as_ref(), &tagged, &WriteOptions::new(AudioFormat::Flac))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `wav` (default): WAV decode/encode via hound (pure Rust)
//! - `flac` (default): FLAC encode via flacenc, decode via claxon (pure Rust)

mod decode;
pub mod error;
pub mod format;
mod options;

pub use decode::DecodedAudio;
pub use error::{IoError, Result};
pub use options::{AudioFormat, BitDepth, FlacOptions, WriteOptions};

use downshift_core::TaggedBuffer;
use std::path::Path;
use tracing::debug;

/// Decode an audio file, choosing the codec from its extension.
///
/// Unknown extensions, or formats whose feature is disabled, yield
/// [`IoError::UnsupportedFormat`].
pub fn read_audio(path: &Path) -> Result<DecodedAudio> {
    let decoded = match AudioFormat::from_path(path) {
        #[cfg(feature = "wav")]
        Some(AudioFormat::Wav) => format::wav::read_wav(path)?,
        #[cfg(feature = "flac")]
        Some(AudioFormat::Flac) => format::flac::read_flac(path)?,
        #[allow(unreachable_patterns)]
        Some(format) => {
            return Err(IoError::UnsupportedFormat(format!(
                "{} support not enabled (enable '{}' feature)",
                format,
                format.extension()
            )))
        }
        None => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot decode {}",
                path.display()
            )))
        }
    };

    debug!(
        "Read {}: {} frames, {} ch, {} Hz, {}-bit",
        path.display(),
        decoded.frames(),
        decoded.channels,
        decoded.sample_rate,
        decoded.bits_per_sample
    );
    Ok(decoded)
}

/// Encode `audio` to a file at its tagged sample rate.
#[allow(unused_variables)]
pub fn write_audio(path: &Path, audio: &TaggedBuffer, options: &WriteOptions) -> Result<()> {
    let channels = channel_count(audio)?;
    let samples = audio.buffer.samples();

    debug!(
        "Writing {} ({}, {} frames at {} Hz)",
        path.display(),
        options.format,
        audio.buffer.frames(),
        audio.sample_rate
    );

    match options.format {
        AudioFormat::Wav => {
            #[cfg(feature = "wav")]
            return format::wav::encode_wav_file(
                samples,
                path,
                &format::wav::WavConfig::new(audio.sample_rate, options.bit_depth, channels),
            );
            #[cfg(not(feature = "wav"))]
            return Err(IoError::UnsupportedFormat(
                "WAV support not enabled (enable 'wav' feature)".into(),
            ));
        }
        AudioFormat::Flac => {
            #[cfg(feature = "flac")]
            return format::flac::encode_flac_file(
                samples,
                path,
                &format::flac::FlacConfig::new(audio.sample_rate, options.bit_depth, channels)
                    .with_block_size(options.flac.block_size),
            );
            #[cfg(not(feature = "flac"))]
            return Err(IoError::UnsupportedFormat(
                "FLAC support not enabled (enable 'flac' feature)".into(),
            ));
        }
    }
}

/// Encode `audio` to container bytes in memory.
#[allow(unused_variables)]
pub fn encode_audio(audio: &TaggedBuffer, options: &WriteOptions) -> Result<Vec<u8>> {
    let channels = channel_count(audio)?;
    let samples = audio.buffer.samples();

    match options.format {
        AudioFormat::Wav => {
            #[cfg(feature = "wav")]
            return format::wav::encode_wav_memory(
                samples,
                &format::wav::WavConfig::new(audio.sample_rate, options.bit_depth, channels),
            );
            #[cfg(not(feature = "wav"))]
            return Err(IoError::UnsupportedFormat(
                "WAV support not enabled (enable 'wav' feature)".into(),
            ));
        }
        AudioFormat::Flac => {
            #[cfg(feature = "flac")]
            return format::flac::encode_flac_memory(
                samples,
                &format::flac::FlacConfig::new(audio.sample_rate, options.bit_depth, channels)
                    .with_block_size(options.flac.block_size),
            );
            #[cfg(not(feature = "flac"))]
            return Err(IoError::UnsupportedFormat(
                "FLAC support not enabled (enable 'flac' feature)".into(),
            ));
        }
    }
}

fn channel_count(audio: &TaggedBuffer) -> Result<u16> {
    u16::try_from(audio.buffer.channels()).map_err(|_| {
        IoError::InvalidData(format!("{} channels is too many", audio.buffer.channels()))
    })
}

#[cfg(all(test, feature = "wav", feature = "flac"))]
mod tests {
    use super::*;
    use downshift_core::SampleBuffer;

    fn tagged() -> TaggedBuffer {
        let samples = (0..2000).map(|i| ((i as f64) * 0.05).sin() * 0.5).collect();
        TaggedBuffer::new(SampleBuffer::new(samples, 2).unwrap(), 32000)
    }

    #[test]
    fn test_write_and_read_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let audio = tagged();
        write_audio(&path, &audio, &WriteOptions::default()).unwrap();

        let decoded = read_audio(&path).unwrap();
        assert_eq!(decoded.sample_rate, 32000);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.bits_per_sample, 16);

        let buffer = decoded.into_buffer().unwrap();
        assert_eq!(buffer.frames(), 1000);
        for (a, b) in buffer.samples().iter().zip(audio.buffer.samples()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_write_flac_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.flac");

        write_audio(&path, &tagged(), &WriteOptions::new(AudioFormat::Flac)).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..4], b"fLaC");
    }

    #[test]
    fn test_write_and_read_flac() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.flac");

        let audio = tagged();
        let options = WriteOptions::new(AudioFormat::Flac).with_bit_depth(BitDepth::Int24);
        write_audio(&path, &audio, &options).unwrap();

        let decoded = read_audio(&path).unwrap();
        assert_eq!(decoded.sample_rate, 32000);
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.bits_per_sample, 24);

        let buffer = decoded.into_buffer().unwrap();
        assert_eq!(buffer.frames(), 1000);
        for (a, b) in buffer.samples().iter().zip(audio.buffer.samples()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            read_audio(Path::new("song.mp3")),
            Err(IoError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_audio(Path::new("/nonexistent/dir/missing.wav"));
        assert!(matches!(result, Err(IoError::Io(_))));
    }

    #[test]
    fn test_encode_audio_in_memory() {
        let wav = encode_audio(&tagged(), &WriteOptions::default()).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");

        let options = WriteOptions::new(AudioFormat::Flac).with_bit_depth(BitDepth::Float32);
        assert!(matches!(
            encode_audio(&tagged(), &options),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
