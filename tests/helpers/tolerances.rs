//! Tolerance constants for transform testing.
//!
//! Different engines and containers require different precision levels.

/// Floating point rounding errors (identity paths, exact FFT round trips).
pub const FLOAT_EPSILON: f64 = 1e-6;

/// Fourier round trip on a band-limited, non-periodic signal.
pub const PRECISION_EPSILON: f64 = 1e-3;

/// Windowed-sinc round trip RMS error for low tones (passband ripple).
pub const FAST_RMS_EPSILON: f64 = 0.01;

/// Silence threshold (~-120dB after a steep stopband).
pub const SILENCE_THRESHOLD: f64 = 1e-6;

/// 16-bit quantization step size.
/// Use when comparing against samples that went through a 16-bit file.
pub const INT16_EPSILON: f64 = 1.0 / 32768.0;
