//! Pluggable resampler backends.
//!
//! Each [`Engine`] is served by one [`ResamplerBackend`]. Backends are only
//! registered when their numeric library is compiled in, so asking for a
//! missing one yields [`Error::EngineUnavailable`] instead of a panic or a
//! silent fallback.

#[cfg(feature = "precision")]
mod fourier;
#[cfg(feature = "fast")]
mod sinc;

#[cfg(feature = "precision")]
pub use fourier::FourierResampler;
#[cfg(feature = "fast")]
pub use sinc::SincResampler;

use crate::buffer::SampleBuffer;
use crate::context::Engine;
use crate::error::{Error, Result};
use tracing::debug;

/// Converts a whole buffer from one sample rate to another.
///
/// Rates are declared by the caller and need not match the rate the audio was
/// recorded at; the downshift transform relies on that.
pub trait ResamplerBackend: Send + Sync {
    /// The selector this backend answers to.
    fn engine(&self) -> Engine;

    /// Resample `buffer`, preserving its channel count.
    ///
    /// Callers go through [`BackendRegistry::resample`], which validates the
    /// rates and handles the identity case before this is reached.
    fn resample(
        &self,
        buffer: &SampleBuffer,
        source_rate: f64,
        dest_rate: f64,
    ) -> Result<SampleBuffer>;
}

/// Frame count a rate conversion is expected to produce.
pub fn expected_frames(frames: usize, source_rate: f64, dest_rate: f64) -> usize {
    (frames as f64 * dest_rate / source_rate).round() as usize
}

/// Capability-checked set of resampler backends.
#[derive(Default)]
pub struct BackendRegistry {
    backends: Vec<Box<dyn ResamplerBackend>>,
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("engines", &self.engines())
            .finish()
    }
}

impl BackendRegistry {
    /// A registry with no backends at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register every backend compiled into this build.
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::empty();

        #[cfg(feature = "precision")]
        registry.register(Box::new(FourierResampler::new()));

        #[cfg(feature = "fast")]
        registry.register(Box::new(SincResampler::new()));

        registry
    }

    /// Add a backend. A later registration for the same engine replaces the
    /// earlier one.
    pub fn register(&mut self, backend: Box<dyn ResamplerBackend>) {
        let engine = backend.engine();
        self.backends.retain(|b| b.engine() != engine);
        debug!("Registered resampler backend: {}", engine);
        self.backends.push(backend);
    }

    pub fn is_available(&self, engine: Engine) -> bool {
        self.backends.iter().any(|b| b.engine() == engine)
    }

    /// Engines that can currently be used.
    pub fn engines(&self) -> Vec<Engine> {
        self.backends.iter().map(|b| b.engine()).collect()
    }

    /// Look up the backend for `engine`.
    pub fn get(&self, engine: Engine) -> Result<&dyn ResamplerBackend> {
        self.backends
            .iter()
            .find(|b| b.engine() == engine)
            .map(|b| b.as_ref())
            .ok_or_else(|| {
                Error::EngineUnavailable(format!(
                    "resampler engine '{}' is not available in this build",
                    engine
                ))
            })
    }

    /// Resample `buffer` from `source_rate` to `dest_rate` with `engine`.
    pub fn resample(
        &self,
        buffer: &SampleBuffer,
        source_rate: f64,
        dest_rate: f64,
        engine: Engine,
    ) -> Result<SampleBuffer> {
        validate_rate("source", source_rate)?;
        validate_rate("destination", dest_rate)?;

        let backend = self.get(engine)?;

        debug!(
            "Resampling {} frames from {:.0} Hz to {:.0} Hz (engine: {})",
            buffer.frames(),
            source_rate,
            dest_rate,
            engine
        );

        if source_rate == dest_rate {
            return Ok(buffer.clone());
        }

        if expected_frames(buffer.frames(), source_rate, dest_rate) == 0 {
            return Err(Error::InvalidInput(format!(
                "{} frames at {} Hz resample to an empty buffer at {} Hz",
                buffer.frames(),
                source_rate,
                dest_rate
            )));
        }

        backend.resample(buffer, source_rate, dest_rate)
    }
}

/// Resample with the backends compiled into this build.
pub fn resample(
    buffer: &SampleBuffer,
    source_rate: f64,
    dest_rate: f64,
    engine: Engine,
) -> Result<SampleBuffer> {
    BackendRegistry::detect().resample(buffer, source_rate, dest_rate, engine)
}

fn validate_rate(label: &str, rate: f64) -> Result<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{} rate must be positive, got {}",
            label, rate
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Duplicate;

    impl ResamplerBackend for Duplicate {
        fn engine(&self) -> Engine {
            Engine::Fast
        }

        fn resample(
            &self,
            buffer: &SampleBuffer,
            source_rate: f64,
            dest_rate: f64,
        ) -> Result<SampleBuffer> {
            let frames = expected_frames(buffer.frames(), source_rate, dest_rate);
            SampleBuffer::new(vec![0.25; frames * buffer.channels()], buffer.channels())
        }
    }

    fn ramp(frames: usize) -> SampleBuffer {
        SampleBuffer::mono((0..frames).map(|i| i as f64 / frames as f64).collect()).unwrap()
    }

    #[test]
    fn test_expected_frames() {
        assert_eq!(expected_frames(44100, 34000.0, 44100.0), 57200);
        assert_eq!(expected_frames(57200, 44100.0, 34000.0), 44100);
        assert_eq!(expected_frames(100, 48000.0, 48000.0), 100);
    }

    #[test]
    fn test_empty_registry_reports_unavailable() {
        let registry = BackendRegistry::empty();
        assert!(!registry.is_available(Engine::Precision));

        let result = registry.resample(&ramp(16), 48000.0, 44100.0, Engine::Precision);
        assert!(matches!(result, Err(Error::EngineUnavailable(_))));
    }

    #[test]
    fn test_custom_backend_registration() {
        let mut registry = BackendRegistry::empty();
        registry.register(Box::new(Duplicate));

        assert_eq!(registry.engines(), vec![Engine::Fast]);
        assert!(matches!(
            registry.resample(&ramp(16), 1.0, 2.0, Engine::Precision),
            Err(Error::EngineUnavailable(_))
        ));

        let out = registry.resample(&ramp(16), 1.0, 2.0, Engine::Fast).unwrap();
        assert_eq!(out.frames(), 32);
    }

    #[test]
    fn test_register_replaces_same_engine() {
        let mut registry = BackendRegistry::empty();
        registry.register(Box::new(Duplicate));
        registry.register(Box::new(Duplicate));
        assert_eq!(registry.engines().len(), 1);
    }

    #[test]
    fn test_invalid_rates() {
        let mut registry = BackendRegistry::empty();
        registry.register(Box::new(Duplicate));

        for (src, dst) in [(0.0, 44100.0), (44100.0, -1.0), (f64::INFINITY, 1.0)] {
            let result = registry.resample(&ramp(8), src, dst, Engine::Fast);
            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }
    }

    #[test]
    fn test_identity_rate_is_copy() {
        let mut registry = BackendRegistry::empty();
        registry.register(Box::new(Duplicate));

        let input = ramp(10);
        let out = registry.resample(&input, 44100.0, 44100.0, Engine::Fast).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_vanishing_output_rejected() {
        let mut registry = BackendRegistry::empty();
        registry.register(Box::new(Duplicate));

        let result = registry.resample(&ramp(1), 44100.0, 100.0, Engine::Fast);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[cfg(all(feature = "precision", feature = "fast"))]
    #[test]
    fn test_detect_registers_compiled_backends() {
        let registry = BackendRegistry::detect();
        assert!(registry.is_available(Engine::Precision));
        assert!(registry.is_available(Engine::Fast));
    }
}
