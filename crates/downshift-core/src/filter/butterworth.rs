//! Butterworth low-pass design as cascaded second-order sections.
//!
//! Analog poles sit on the unit circle at `-sin(θk) ± j·cos(θk)` with
//! `θk = π(2k + 1) / 2N`. Each conjugate pair becomes one biquad through the
//! bilinear transform with the cutoff pre-warped, and odd orders get one extra
//! first-order section for the real pole.

use std::f64::consts::PI;

/// One second-order section, `a0` normalized to 1.
///
/// Difference equation: `y = b0·x + b1·x[-1] + b2·x[-2] - a1·y[-1] - a2·y[-2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Biquad {
    /// Gain at DC.
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }

    /// Transposed direct form II state for a constant input `x`.
    pub fn steady_state(&self, x: f64) -> [f64; 2] {
        let y = self.dc_gain() * x;
        let z2 = self.b2 * x - self.a2 * y;
        let z1 = y - self.b0 * x;
        [z1, z2]
    }

    /// Run the section over `data` in place, starting from `state`.
    pub fn process(&self, data: &mut [f64], mut state: [f64; 2]) {
        for sample in data.iter_mut() {
            let x = *sample;
            let y = self.b0 * x + state[0];
            state[0] = self.b1 * x - self.a1 * y + state[1];
            state[1] = self.b2 * x - self.a2 * y;
            *sample = y;
        }
    }
}

/// Design an `order`-th order Butterworth low-pass.
///
/// `normalized_cutoff` is the cutoff divided by Nyquist and must lie in
/// `(0, 1)`.
pub fn lowpass(order: usize, normalized_cutoff: f64) -> Vec<Biquad> {
    // Pre-warped analog cutoff for the bilinear transform
    let k = (PI * normalized_cutoff / 2.0).tan();
    let k2 = k * k;

    let mut sections = Vec::with_capacity(order.div_ceil(2));

    if order % 2 == 1 {
        let norm = 1.0 / (1.0 + k);
        sections.push(Biquad {
            b0: k * norm,
            b1: k * norm,
            b2: 0.0,
            a1: (k - 1.0) * norm,
            a2: 0.0,
        });
    }

    for pair in 0..order / 2 {
        let theta = PI * (2 * pair + 1) as f64 / (2 * order) as f64;
        let damping = 2.0 * theta.sin();
        let norm = 1.0 / (1.0 + damping * k + k2);
        let b0 = k2 * norm;
        sections.push(Biquad {
            b0,
            b1: 2.0 * b0,
            b2: b0,
            a1: 2.0 * (k2 - 1.0) * norm,
            a2: (1.0 - damping * k + k2) * norm,
        });
    }

    sections
}

/// Magnitude response of a cascade at `normalized_freq` (fraction of Nyquist).
pub fn magnitude(sections: &[Biquad], normalized_freq: f64) -> f64 {
    let w = PI * normalized_freq;
    let (c1, s1) = (w.cos(), w.sin());
    let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

    sections
        .iter()
        .map(|s| {
            let num_re = s.b0 + s.b1 * c1 + s.b2 * c2;
            let num_im = -(s.b1 * s1 + s.b2 * s2);
            let den_re = 1.0 + s.a1 * c1 + s.a2 * c2;
            let den_im = -(s.a1 * s1 + s.a2 * s2);
            (num_re.hypot(num_im)) / (den_re.hypot(den_im))
        })
        .product()
}
