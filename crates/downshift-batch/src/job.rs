//! Per-batch settings, input discovery and the single-file pipeline.

use crate::error::{BatchError, Result};
use crate::profiles::Profile;
use downshift_core::{Downshifter, Engine, Mode, TransformContext, DEFAULT_CUTOFF_HZ};
use downshift_io::{read_audio, write_audio, AudioFormat, WriteOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything needed to process one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    pub mode: Mode,
    pub engine: Engine,
    pub cutoff: f64,
    pub output: WriteOptions,
    /// Existing folder the results are written to.
    pub output_dir: PathBuf,
}

impl JobSettings {
    pub fn new(mode: Mode, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            engine: Engine::default(),
            cutoff: DEFAULT_CUTOFF_HZ,
            output: WriteOptions::default(),
            output_dir: output_dir.into(),
        }
    }

    /// Take engine, cutoff and container from a saved profile.
    pub fn with_profile(mut self, profile: &Profile) -> Self {
        self.engine = profile.resampler;
        self.cutoff = profile.cutoff;
        self.output.format = profile.output_format;
        self
    }

    pub fn with_engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.output.format = format;
        self
    }

    /// Check what can be checked before any file is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.output_dir.is_dir() {
            return Err(BatchError::InvalidSettings(format!(
                "output folder {} does not exist",
                self.output_dir.display()
            )));
        }
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(downshift_core::Error::InvalidCutoff(self.cutoff).into());
        }
        Ok(())
    }

    /// `{stem}_prepared.{ext}` or `{stem}_restored.{ext}` in the output folder.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let suffix = match self.mode {
            Mode::Prepare => "prepared",
            Mode::Restore => "restored",
        };

        self.output_dir.join(format!(
            "{}_{}.{}",
            stem,
            suffix,
            self.output.format.extension()
        ))
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Resolve the files a batch runs over.
///
/// A folder yields its `.wav` files sorted by path, then its `.flac` files
/// sorted by path. Subfolders are not searched.
pub fn collect_inputs(path: &Path, folder: bool) -> Result<Vec<PathBuf>> {
    if !folder {
        if !path.is_file() || !(has_extension(path, "wav") || has_extension(path, "flac")) {
            return Err(BatchError::InvalidSettings(format!(
                "{} is not a valid audio file",
                path.display()
            )));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        return Err(BatchError::InvalidSettings(format!(
            "{} is not a valid folder",
            path.display()
        )));
    }

    let mut wav = Vec::new();
    let mut flac = Vec::new();
    for entry in fs::read_dir(path)? {
        let file = entry?.path();
        if !file.is_file() {
            continue;
        }
        if has_extension(&file, "wav") {
            wav.push(file);
        } else if has_extension(&file, "flac") {
            flac.push(file);
        }
    }
    wav.sort();
    flac.sort();
    wav.append(&mut flac);

    if wav.is_empty() {
        return Err(BatchError::InvalidSettings(format!(
            "no compatible audio files found in {}",
            path.display()
        )));
    }

    debug!("Found {} audio files in {}", wav.len(), path.display());
    Ok(wav)
}

/// Decode, transform and encode one file. Returns the written path.
pub fn process_file(shifter: &Downshifter, input: &Path, settings: &JobSettings) -> Result<PathBuf> {
    let decoded = read_audio(input)?;
    let context = TransformContext::new(decoded.sample_rate, settings.cutoff)?;
    let buffer = decoded.into_buffer()?;

    let tagged = shifter.run(settings.mode, buffer, &context, settings.engine)?;

    let output = settings.output_path(input);
    write_audio(&output, &tagged, &settings.output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_naming() {
        let settings = JobSettings::new(Mode::Prepare, "/out");
        assert_eq!(
            settings.output_path(Path::new("/in/Track 01.wav")),
            PathBuf::from("/out/Track 01_prepared.wav")
        );

        let settings = JobSettings::new(Mode::Restore, "/out").with_format(AudioFormat::Flac);
        assert_eq!(
            settings.output_path(Path::new("/in/mix.final.wav")),
            PathBuf::from("/out/mix.final_restored.flac")
        );
    }

    #[test]
    fn test_profile_applied() {
        let profile = Profile {
            resampler: Engine::Fast,
            output_format: AudioFormat::Flac,
            cutoff: 15000.0,
        };
        let settings = JobSettings::new(Mode::Prepare, "/out").with_profile(&profile);
        assert_eq!(settings.engine, Engine::Fast);
        assert_eq!(settings.cutoff, 15000.0);
        assert_eq!(settings.output.format, AudioFormat::Flac);
    }

    #[test]
    fn test_validate() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JobSettings::new(Mode::Prepare, dir.path()).validate().is_ok());

        let missing = JobSettings::new(Mode::Prepare, dir.path().join("nope"));
        assert!(matches!(
            missing.validate(),
            Err(BatchError::InvalidSettings(_))
        ));

        let zero = JobSettings::new(Mode::Prepare, dir.path()).with_cutoff(0.0);
        assert!(matches!(
            zero.validate(),
            Err(BatchError::Kernel(downshift_core::Error::InvalidCutoff(_)))
        ));
    }

    #[test]
    fn test_collect_folder_orders_wav_before_flac() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.wav", "a.flac", "c.wav", "notes.txt", "a.wav"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("sub.wav")).unwrap();

        let inputs = collect_inputs(dir.path(), true).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.wav", "b.wav", "c.wav", "a.flac"]);
    }

    #[test]
    fn test_collect_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("take.WAV");
        let txt = dir.path().join("take.txt");
        fs::write(&wav, b"").unwrap();
        fs::write(&txt, b"").unwrap();

        assert_eq!(collect_inputs(&wav, false).unwrap(), vec![wav.clone()]);
        assert!(collect_inputs(&txt, false).is_err());
        assert!(collect_inputs(dir.path(), false).is_err());
        assert!(collect_inputs(&wav, true).is_err());
    }

    #[test]
    fn test_collect_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_inputs(dir.path(), true),
            Err(BatchError::InvalidSettings(_))
        ));
    }
}
