//! Streaming windowed-sinc resampling using rubato
//!
//! Runs rubato's sinc resampler at its highest quality preset over the buffer
//! in fixed chunks and flushes the tail. `SincFixedIn` output is already
//! aligned with its input, so frame `n` in lands at `n * ratio` out.

use super::{expected_frames, ResamplerBackend};
use crate::buffer::SampleBuffer;
use crate::context::Engine;
use crate::error::Result;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Input frames fed to rubato per call.
const CHUNK_SIZE: usize = 1024;

/// The `fast` engine.
#[derive(Debug, Clone, Copy)]
pub struct SincResampler {
    chunk_size: usize,
}

impl Default for SincResampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SincResampler {
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Use a different chunk size (mostly useful for tests).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    fn parameters() -> SincInterpolationParameters {
        SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Cubic,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        }
    }
}

impl ResamplerBackend for SincResampler {
    fn engine(&self) -> Engine {
        Engine::Fast
    }

    fn resample(
        &self,
        buffer: &SampleBuffer,
        source_rate: f64,
        dest_rate: f64,
    ) -> Result<SampleBuffer> {
        let channels = buffer.channels();
        let frames_in = buffer.frames();
        let frames_out = expected_frames(frames_in, source_rate, dest_rate);

        let mut resampler = SincFixedIn::<f64>::new(
            dest_rate / source_rate,
            1.0,
            Self::parameters(),
            self.chunk_size,
            channels,
        )?;

        let planar = buffer.to_planar();
        let mut output: Vec<Vec<f64>> =
            vec![Vec::with_capacity(frames_out + self.chunk_size); channels];

        let mut pos = 0;
        while frames_in - pos >= resampler.input_frames_next() {
            let needed = resampler.input_frames_next();
            let chunk: Vec<&[f64]> = planar.iter().map(|c| &c[pos..pos + needed]).collect();
            let block = resampler.process(&chunk, None)?;
            append(&mut output, block);
            pos += needed;
        }

        if pos < frames_in {
            let tail: Vec<&[f64]> = planar.iter().map(|c| &c[pos..]).collect();
            let block = resampler.process_partial(Some(tail.as_slice()), None)?;
            append(&mut output, block);
        }

        // Drain the filter's delay line with silence
        while output[0].len() < frames_out {
            let block = resampler.process_partial(None::<&[Vec<f64>]>, None)?;
            if block.first().map_or(true, |b| b.is_empty()) {
                break;
            }
            append(&mut output, block);
        }

        for channel in output.iter_mut() {
            channel.resize(frames_out, 0.0);
        }

        SampleBuffer::from_planar(output)
    }
}

fn append(output: &mut [Vec<f64>], block: Vec<Vec<f64>>) {
    for (dst, src) in output.iter_mut().zip(block) {
        dst.extend_from_slice(&src);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, rate: f64, frames: usize) -> Vec<f64> {
        (0..frames)
            .map(|i| (2.0 * PI * freq * i as f64 / rate).sin())
            .collect()
    }

    #[test]
    fn test_output_length() {
        let buffer = SampleBuffer::mono(sine(440.0, 44100.0, 4410)).unwrap();
        let out = SincResampler::new()
            .resample(&buffer, 44100.0, 48000.0)
            .unwrap();
        assert_eq!(out.frames(), 4800);
    }

    fn impulse(frames: usize, at: usize) -> SampleBuffer {
        let mut samples = vec![0.0; frames];
        samples[at] = 1.0;
        SampleBuffer::mono(samples).unwrap()
    }

    fn peak_index(samples: &[f64]) -> usize {
        samples
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(i, _)| i)
            .unwrap()
    }

    #[test]
    fn test_impulse_lands_in_place() {
        for (from, to) in [(44100.0, 48000.0), (44100.0, 32000.0), (34000.0, 44100.0)] {
            let out = SincResampler::new()
                .resample(&impulse(10000, 5000), from, to)
                .unwrap();
            let expected = 5000.0 * to / from;
            let found = peak_index(out.samples()) as f64;
            assert!(
                (found - expected).abs() <= 1.0,
                "{} -> {}: peak at {}, expected {}",
                from,
                to,
                found,
                expected
            );
        }
    }

    #[test]
    fn test_impulse_alignment_with_small_chunks() {
        let out = SincResampler::new()
            .with_chunk_size(512)
            .resample(&impulse(4000, 1500), 44100.0, 22050.0)
            .unwrap();
        assert_eq!(out.frames(), 2000);
        assert!((peak_index(out.samples()) as f64 - 750.0).abs() <= 1.0);
    }

    #[test]
    fn test_sine_matches_target_rate() {
        let buffer = SampleBuffer::mono(sine(500.0, 44100.0, 8820)).unwrap();
        let out = SincResampler::new()
            .resample(&buffer, 44100.0, 32000.0)
            .unwrap();

        let reference = sine(500.0, 32000.0, out.frames());
        let middle = out.frames() / 4..3 * out.frames() / 4;
        let worst = middle
            .map(|i| (out.samples()[i] - reference[i]).abs())
            .fold(0.0_f64, f64::max);
        assert!(worst < 0.05, "max deviation {}", worst);
    }

    #[test]
    fn test_preserves_channels() {
        let left = sine(300.0, 16000.0, 1600);
        let right = sine(600.0, 16000.0, 1600);
        let buffer = SampleBuffer::from_planar(vec![left, right]).unwrap();

        let out = SincResampler::new()
            .resample(&buffer, 16000.0, 22050.0)
            .unwrap();
        assert_eq!(out.channels(), 2);
        assert_eq!(out.frames(), 2205);
    }

    #[test]
    fn test_short_buffer() {
        let buffer = SampleBuffer::mono(sine(100.0, 8000.0, 10)).unwrap();
        let out = SincResampler::new().resample(&buffer, 8000.0, 16000.0).unwrap();
        assert_eq!(out.frames(), 20);
    }
}
