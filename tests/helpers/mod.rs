//! Test helpers and fixtures for spectradownshift integration tests
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (identity, periodic FFT round trips)
//! - `PRECISION_EPSILON` (1e-3): Fourier round trips on arbitrary material
//! - `FAST_RMS_EPSILON` (0.01): Sinc round trips
//! - `INT16_EPSILON`: One 16-bit quantization step

#![allow(dead_code)]

pub mod tolerances;

use spectradownshift::prelude::*;
use std::path::Path;

/// Standard original rate for scenarios.
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Standard cutoff for scenarios.
pub const TEST_CUTOFF: f64 = 17000.0;

pub fn test_context() -> TransformContext {
    TransformContext::new(TEST_SAMPLE_RATE, TEST_CUTOFF).expect("valid context")
}

/// Generate a sine wave at given frequency for specified frames.
pub fn generate_sine(frequency: f64, sample_rate: f64, num_frames: usize) -> Vec<f64> {
    (0..num_frames)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (2.0 * std::f64::consts::PI * frequency * t).sin()
        })
        .collect()
}

/// Mono buffer holding a sine at `amplitude`.
pub fn sine_buffer(frequency: f64, num_frames: usize, amplitude: f64) -> SampleBuffer {
    let samples = generate_sine(frequency, TEST_SAMPLE_RATE as f64, num_frames)
        .into_iter()
        .map(|s| s * amplitude)
        .collect();
    SampleBuffer::mono(samples).expect("valid buffer")
}

/// Calculate RMS of a signal.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |a, s| a.max(s.abs()))
}

/// RMS of the sample-wise difference over the common length.
pub fn rms_error(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    let diff: Vec<f64> = a[..n].iter().zip(&b[..n]).map(|(x, y)| x - y).collect();
    rms(&diff)
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f64], tolerance: f64) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Write an integer PCM WAV fixture with hound.
pub fn write_wav_fixture(path: &Path, samples: &[f64], channels: u16, sample_rate: u32, bits: u16) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: hound::SampleFormat::Int,
    };
    let scale = ((1i64 << (bits - 1)) - 1) as f64;
    let mut writer = hound::WavWriter::create(path, spec).expect("create fixture");
    for &s in samples {
        writer
            .write_sample((s.clamp(-1.0, 1.0) * scale) as i32)
            .expect("write fixture sample");
    }
    writer.finalize().expect("finalize fixture");
}

/// Read back a WAV written by the crate: (interleaved samples, channels, rate, bits).
pub fn read_wav(path: &Path) -> (Vec<f64>, u16, u32, u16) {
    let mut reader = hound::WavReader::open(path).expect("open wav");
    let spec = reader.spec();
    let scale = (1i64 << (spec.bits_per_sample - 1)) as f64;
    let samples = reader
        .samples::<i32>()
        .map(|s| s.expect("read sample") as f64 / scale)
        .collect();
    (samples, spec.channels, spec.sample_rate, spec.bits_per_sample)
}
