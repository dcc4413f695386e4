//! Forward-backward filtering.
//!
//! The cascade runs over the signal, then over the reversed result, so phase
//! cancels and magnitude is squared. Both ends are extended by odd reflection
//! and each pass starts from the steady state for its first sample, which
//! keeps start-up transients out of the returned range.

use super::butterworth::Biquad;

/// Frames of reflection padding used for a cascade of `sections` biquads.
pub fn pad_len(sections: usize) -> usize {
    3 * (2 * sections + 1)
}

/// Zero-phase filter one channel through `sections`.
pub fn filtfilt(sections: &[Biquad], signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 || sections.is_empty() {
        return signal.to_vec();
    }

    let pad = pad_len(sections.len()).min(n - 1);
    let mut work = odd_extend(signal, pad);

    run_cascade(sections, &mut work);
    work.reverse();
    run_cascade(sections, &mut work);
    work.reverse();

    work.drain(..pad);
    work.truncate(n);
    work
}

fn run_cascade(sections: &[Biquad], data: &mut [f64]) {
    // Each section starts settled on the level it will see first
    let mut level = data[0];
    for section in sections {
        section.process(data, section.steady_state(level));
        level *= section.dc_gain();
    }
}

/// Extend `signal` by `pad` frames at both ends, reflected about the end points.
fn odd_extend(signal: &[f64], pad: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];

    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - signal[i]));
    out.extend_from_slice(signal);
    out.extend((n - 1 - pad..n - 1).rev().map(|i| 2.0 * last - signal[i]));
    out
}

#[cfg(test)]
mod tests {
    use super::super::butterworth::lowpass;
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_odd_extend() {
        let ext = odd_extend(&[1.0, 2.0, 4.0, 7.0], 2);
        assert_eq!(ext, vec![-2.0, 0.0, 1.0, 2.0, 4.0, 7.0, 10.0, 12.0]);
    }

    #[test]
    fn test_constant_passes_unchanged() {
        let sections = lowpass(24, 0.3);
        let out = filtfilt(&sections, &vec![0.5; 500]);
        for s in out {
            assert_abs_diff_eq!(s, 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_single_sample() {
        let sections = lowpass(8, 0.3);
        let out = filtfilt(&sections, &[0.25]);
        assert_eq!(out.len(), 1);
        assert_abs_diff_eq!(out[0], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_length_preserved_for_short_signal() {
        let sections = lowpass(24, 0.5);
        let signal: Vec<f64> = (0..20).map(|i| (i as f64 * 0.3).sin()).collect();
        assert_eq!(filtfilt(&sections, &signal).len(), 20);
    }

    #[test]
    fn test_impulse_response_symmetric() {
        let sections = lowpass(8, 0.2);
        let mut signal = vec![0.0; 401];
        signal[200] = 1.0;
        let out = filtfilt(&sections, &signal);

        for offset in 1..60 {
            assert_abs_diff_eq!(out[200 - offset], out[200 + offset], epsilon = 1e-9);
        }
    }
}
