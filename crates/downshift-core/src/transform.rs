//! The downshift transform.
//!
//! A buffer has no speed of its own; only the pair (frame count, nominal rate)
//! fixes its duration and pitch. `prepare` resamples while claiming the audio
//! was recorded at the intermediate rate `I = 2·C`, which stretches it by
//! `R / I` and squeezes its spectrum below `C`. `restore` resamples back from
//! `R` to `I` and simply tags the result with `R` again.

use crate::buffer::{SampleBuffer, TaggedBuffer};
use crate::context::{Engine, Mode, TransformContext};
use crate::error::Result;
use crate::filter::AntiAliasFilter;
use crate::resample::BackendRegistry;
use tracing::debug;

/// Runs `prepare`/`restore` against a fixed set of backends.
///
/// Holds no per-call state and can be shared across threads.
#[derive(Debug)]
pub struct Downshifter {
    registry: BackendRegistry,
    filter: AntiAliasFilter,
}

impl Default for Downshifter {
    fn default() -> Self {
        Self::new()
    }
}

impl Downshifter {
    /// Use every backend compiled into this build.
    pub fn new() -> Self {
        Self::with_registry(BackendRegistry::detect())
    }

    pub fn with_registry(registry: BackendRegistry) -> Self {
        Self {
            registry,
            filter: AntiAliasFilter::default(),
        }
    }

    /// Override the anti-alias filter used after the `fast` engine.
    pub fn with_filter(mut self, filter: AntiAliasFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Slow the material down by `R / 2C` and shift its spectrum below `C`.
    pub fn prepare(
        &self,
        buffer: SampleBuffer,
        context: &TransformContext,
        engine: Engine,
    ) -> Result<TaggedBuffer> {
        let original = context.original_rate();
        let intermediate = context.intermediate_rate();

        debug!(
            "Preparing: interpreting speed x{:.4} ({} Hz as {:.0} Hz)",
            context.speed_factor(),
            original,
            intermediate
        );

        let stretched = self
            .registry
            .resample(&buffer, intermediate, original as f64, engine)?;

        // The sinc engine leaks above C in this relabeled regime
        let output = if engine.needs_anti_alias() {
            self.filter
                .apply(stretched, original as f64, context.cutoff())?
        } else {
            stretched
        };

        debug!("Prepared {} frames at {} Hz", output.frames(), original);
        Ok(TaggedBuffer::new(output, original))
    }

    /// Undo [`prepare`](Self::prepare): downsample to `2C` and relabel as `R`.
    pub fn restore(
        &self,
        buffer: SampleBuffer,
        context: &TransformContext,
        engine: Engine,
    ) -> Result<TaggedBuffer> {
        let original = context.original_rate();
        let intermediate = context.intermediate_rate();

        let converted = self
            .registry
            .resample(&buffer, original as f64, intermediate, engine)?;

        debug!(
            "Restoring: interpreting speed x{:.4} ({:.0} Hz as {} Hz)",
            original as f64 / intermediate,
            intermediate,
            original
        );

        Ok(TaggedBuffer::new(converted, original))
    }

    /// Run the transform selected by `mode`.
    pub fn run(
        &self,
        mode: Mode,
        buffer: SampleBuffer,
        context: &TransformContext,
        engine: Engine,
    ) -> Result<TaggedBuffer> {
        match mode {
            Mode::Prepare => self.prepare(buffer, context, engine),
            Mode::Restore => self.restore(buffer, context, engine),
        }
    }
}

/// [`Downshifter::prepare`] with the backends compiled into this build.
pub fn prepare(
    buffer: SampleBuffer,
    context: &TransformContext,
    engine: Engine,
) -> Result<TaggedBuffer> {
    Downshifter::new().prepare(buffer, context, engine)
}

/// [`Downshifter::restore`] with the backends compiled into this build.
pub fn restore(
    buffer: SampleBuffer,
    context: &TransformContext,
    engine: Engine,
) -> Result<TaggedBuffer> {
    Downshifter::new().restore(buffer, context, engine)
}
