//! Per-invocation transform parameters.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default cutoff target in Hz.
pub const DEFAULT_CUTOFF_HZ: f64 = 17000.0;

/// Immutable parameters for one `prepare`/`restore` call.
///
/// The intermediate rate is always derived from the cutoff and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    original_rate: u32,
    cutoff: f64,
}

impl TransformContext {
    /// Create a context for audio authored at `original_rate` Hz.
    ///
    /// A cutoff at or above Nyquist is accepted; the transform then has no
    /// audible band-limiting effect.
    pub fn new(original_rate: u32, cutoff: f64) -> Result<Self> {
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(Error::InvalidCutoff(cutoff));
        }
        if original_rate == 0 {
            return Err(Error::InvalidInput(
                "original sample rate must be positive".into(),
            ));
        }

        Ok(Self {
            original_rate,
            cutoff,
        })
    }

    pub fn original_rate(&self) -> u32 {
        self.original_rate
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// `2 × cutoff`, the rate used as the relabeling pivot.
    pub fn intermediate_rate(&self) -> f64 {
        2.0 * self.cutoff
    }

    /// Ratio `I / R` by which `prepare` slows the material down.
    pub fn speed_factor(&self) -> f64 {
        self.intermediate_rate() / self.original_rate as f64
    }

    pub fn nyquist(&self) -> f64 {
        self.original_rate as f64 / 2.0
    }

    /// Whether the cutoff lies below Nyquist, i.e. the transform band-limits.
    pub fn is_band_limiting(&self) -> bool {
        self.cutoff < self.nyquist()
    }
}

/// Resampler backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Whole-buffer Fourier resampling, exact output length
    #[default]
    #[serde(alias = "scipy")]
    Precision,
    /// Streaming windowed-sinc resampling, looser band-limiting
    #[serde(alias = "soxr")]
    Fast,
}

impl Engine {
    pub const ALL: [Engine; 2] = [Engine::Precision, Engine::Fast];

    pub fn name(&self) -> &'static str {
        match self {
            Engine::Precision => "precision",
            Engine::Fast => "fast",
        }
    }

    /// Whether `prepare` must follow this engine with the anti-alias filter.
    pub fn needs_anti_alias(&self) -> bool {
        matches!(self, Engine::Fast)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "precision" | "accurate" | "scipy" => Ok(Engine::Precision),
            "fast" | "soxr" => Ok(Engine::Fast),
            _ => Err(Error::UnsupportedEngine(s.to_string())),
        }
    }
}

/// Which direction of the transform to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Prepare,
    Restore,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Prepare => "prepare",
            Mode::Restore => "restore",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prepare" => Ok(Mode::Prepare),
            "restore" => Ok(Mode::Restore),
            _ => Err(Error::InvalidInput(format!("unknown mode: {}", s))),
        }
    }
}
