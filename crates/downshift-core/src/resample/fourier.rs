//! Whole-buffer Fourier resampling using rustfft
//!
//! The buffer is treated as one period of a band-limited signal: its spectrum
//! is truncated or zero-padded to the new length and transformed back. The
//! output length is exact and nothing is kept above the smaller of the two
//! Nyquist frequencies.

use super::{expected_frames, ResamplerBackend};
use crate::buffer::SampleBuffer;
use crate::context::Engine;
use crate::error::Result;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// The `precision` engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct FourierResampler;

impl FourierResampler {
    pub fn new() -> Self {
        Self
    }
}

impl ResamplerBackend for FourierResampler {
    fn engine(&self) -> Engine {
        Engine::Precision
    }

    fn resample(
        &self,
        buffer: &SampleBuffer,
        source_rate: f64,
        dest_rate: f64,
    ) -> Result<SampleBuffer> {
        let frames_in = buffer.frames();
        let frames_out = expected_frames(frames_in, source_rate, dest_rate);

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(frames_in);
        let inverse = planner.plan_fft_inverse(frames_out);

        let planar: Vec<Vec<f64>> = buffer
            .to_planar()
            .iter()
            .map(|channel| {
                let mut spectrum: Vec<Complex<f64>> =
                    channel.iter().map(|&s| Complex::new(s, 0.0)).collect();
                forward.process(&mut spectrum);

                let mut resized = resize_spectrum(&spectrum, frames_out);
                inverse.process(&mut resized);

                // rustfft is unnormalized: 1/out for the inverse, out/in for the
                // length change.
                let scale = 1.0 / frames_in as f64;
                resized.iter().map(|c| c.re * scale).collect()
            })
            .collect();

        SampleBuffer::from_planar(planar)
    }
}

/// Map the spectrum of a real signal of length `spectrum.len()` onto a
/// Hermitian spectrum of length `out_len`.
fn resize_spectrum(spectrum: &[Complex<f64>], out_len: usize) -> Vec<Complex<f64>> {
    let in_len = spectrum.len();
    let shared = in_len.min(out_len);
    let kept_bins = shared / 2 + 1;

    // Non-negative half of the output spectrum
    let mut half = vec![Complex::new(0.0, 0.0); out_len / 2 + 1];
    half[..kept_bins].copy_from_slice(&spectrum[..kept_bins]);

    if shared % 2 == 0 {
        let edge = shared / 2;
        if out_len < in_len {
            // Positive and negative bins fold onto the new Nyquist bin
            half[edge] *= 2.0;
        } else if out_len > in_len {
            // Old Nyquist bin is shared between its two mirrored positions
            half[edge] *= 0.5;
        }
    }

    let mut full = vec![Complex::new(0.0, 0.0); out_len];
    full[..half.len()].copy_from_slice(&half);
    for k in 1..(out_len + 1) / 2 {
        full[out_len - k] = half[k].conj();
    }

    // DC and (for even lengths) Nyquist are real for a real signal
    full[0].im = 0.0;
    if out_len % 2 == 0 {
        full[out_len / 2].im = 0.0;
    }

    full
}
