//! Zero-phase anti-alias low-pass.
//!
//! Used after resamplers that leave content above the cutoff. The filter is a
//! steep Butterworth (order `8 × passes`) run forward and backward, so it
//! introduces no delay and keeps sample-for-sample alignment.

#[cfg(feature = "filter")]
pub mod butterworth;
#[cfg(feature = "filter")]
mod zero_phase;

use crate::buffer::SampleBuffer;
use crate::error::{Error, Result};
use tracing::debug;

/// Number of passes used when none is given.
pub const DEFAULT_PASSES: usize = 3;

/// Filter order added per pass.
pub const ORDER_PER_PASS: usize = 8;

/// Low-pass settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntiAliasFilter {
    passes: usize,
}

impl Default for AntiAliasFilter {
    fn default() -> Self {
        Self {
            passes: DEFAULT_PASSES,
        }
    }
}

impl AntiAliasFilter {
    pub fn new(passes: usize) -> Self {
        Self { passes }
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Butterworth order the filter is designed with.
    pub fn order(&self) -> usize {
        ORDER_PER_PASS * self.passes
    }

    /// Whether this build carries the filter primitives.
    pub fn is_available() -> bool {
        cfg!(feature = "filter")
    }

    /// Low-pass `buffer` at `cutoff` Hz.
    ///
    /// A cutoff at or above Nyquist leaves nothing to remove and returns the
    /// input untouched.
    pub fn apply(
        &self,
        buffer: SampleBuffer,
        sample_rate: f64,
        cutoff: f64,
    ) -> Result<SampleBuffer> {
        if self.passes == 0 {
            return Err(Error::InvalidInput("filter needs at least one pass".into()));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidInput(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(Error::InvalidInput(format!(
                "filter cutoff must be positive, got {}",
                cutoff
            )));
        }
        if !Self::is_available() {
            return Err(Error::EngineUnavailable(
                "anti-alias filter is not available in this build".into(),
            ));
        }

        let nyquist = 0.5 * sample_rate;
        if cutoff >= nyquist {
            debug!(
                "Cutoff {} Hz at or above Nyquist {} Hz, skipping filter",
                cutoff, nyquist
            );
            return Ok(buffer);
        }

        debug!(
            "Applying {}-pass filter (order: {}) at {} Hz",
            self.passes,
            self.order(),
            cutoff
        );

        self.filter(buffer, cutoff / nyquist)
    }

    #[cfg(feature = "filter")]
    fn filter(&self, buffer: SampleBuffer, normalized_cutoff: f64) -> Result<SampleBuffer> {
        let sections = butterworth::lowpass(self.order(), normalized_cutoff);
        let planar = buffer
            .to_planar()
            .iter()
            .map(|channel| zero_phase::filtfilt(&sections, channel))
            .collect();
        SampleBuffer::from_planar(planar)
    }

    #[cfg(not(feature = "filter"))]
    fn filter(&self, _buffer: SampleBuffer, _normalized_cutoff: f64) -> Result<SampleBuffer> {
        Err(Error::EngineUnavailable(
            "anti-alias filter is not available in this build".into(),
        ))
    }
}

/// Low-pass `buffer` with a zero-phase Butterworth of order `8 × passes`.
pub fn apply_low_pass(
    buffer: SampleBuffer,
    sample_rate: f64,
    cutoff: f64,
    passes: usize,
) -> Result<SampleBuffer> {
    AntiAliasFilter::new(passes).apply(buffer, sample_rate, cutoff)
}
