//! Named processing profiles persisted as JSON.
//!
//! ```json
//! {
//!   "profiles": {
//!     "Accurate (Scipy)": { "resampler": "precision", "output_format": "wav", "cutoff": 17000.0 }
//!   },
//!   "_app_settings": { "last_input_path": "", "last_output_path": "" }
//! }
//! ```
//!
//! A missing file is created with defaults. A file that does not parse, or
//! lacks either top-level key, is replaced by the defaults as well. A single
//! profile entry that does not parse is skipped with a warning and written
//! back unchanged.

use crate::error::Result;
use downshift_core::{Engine, DEFAULT_CUTOFF_HZ};
use downshift_io::AudioFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// App setting holding the last input file or folder.
pub const LAST_INPUT_PATH: &str = "last_input_path";

/// App setting holding the last output folder.
pub const LAST_OUTPUT_PATH: &str = "last_output_path";

/// Default profile using the precision engine and WAV output.
pub const ACCURATE_PROFILE: &str = "Accurate (Scipy)";

/// Default profile using the fast engine and FLAC output.
pub const FAST_PROFILE: &str = "Fast (Soxr)";

/// One saved set of processing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub resampler: Engine,
    pub output_format: AudioFormat,
    pub cutoff: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            resampler: Engine::Precision,
            output_format: AudioFormat::Wav,
            cutoff: DEFAULT_CUTOFF_HZ,
        }
    }
}

/// File layout as read, before individual profiles are checked.
#[derive(Deserialize)]
struct RawDocument {
    profiles: Map<String, Value>,
    #[serde(rename = "_app_settings")]
    app_settings: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Document {
    profiles: BTreeMap<String, Profile>,
    /// Entries that failed to parse, kept so they survive rewrites.
    unreadable: Map<String, Value>,
    app_settings: BTreeMap<String, String>,
}

impl Document {
    fn from_raw(raw: RawDocument, path: &Path) -> Self {
        let mut profiles = BTreeMap::new();
        let mut unreadable = Map::new();

        for (name, value) in raw.profiles {
            match serde_json::from_value::<Profile>(value.clone()) {
                Ok(profile) => {
                    profiles.insert(name, profile);
                }
                Err(e) => {
                    warn!(
                        "Skipping profile '{}' in {}: {}",
                        name,
                        path.display(),
                        e
                    );
                    unreadable.insert(name, value);
                }
            }
        }

        Self {
            profiles,
            unreadable,
            app_settings: raw.app_settings,
        }
    }

    fn to_json(&self) -> Result<Value> {
        let mut profiles = self.unreadable.clone();
        for (name, profile) in &self.profiles {
            profiles.insert(name.clone(), serde_json::to_value(profile)?);
        }

        let mut root = Map::new();
        root.insert("profiles".into(), Value::Object(profiles));
        root.insert(
            "_app_settings".into(),
            serde_json::to_value(&self.app_settings)?,
        );
        Ok(Value::Object(root))
    }
}

impl Default for Document {
    fn default() -> Self {
        let profiles = BTreeMap::from([
            (ACCURATE_PROFILE.to_string(), Profile::default()),
            (
                FAST_PROFILE.to_string(),
                Profile {
                    resampler: Engine::Fast,
                    output_format: AudioFormat::Flac,
                    cutoff: DEFAULT_CUTOFF_HZ,
                },
            ),
        ]);
        let app_settings = BTreeMap::from([
            (LAST_INPUT_PATH.to_string(), String::new()),
            (LAST_OUTPUT_PATH.to_string(), String::new()),
        ]);

        Self {
            profiles,
            unreadable: Map::new(),
            app_settings,
        }
    }
}

/// Profiles and app settings backed by a JSON file.
///
/// Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    document: Document,
}

impl ProfileStore {
    /// Load the store at `path`, creating or recreating it with defaults.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!("Creating profile store {}", path.display());
            return Self::recreate(path);
        }

        let text = fs::read_to_string(&path)?;
        match serde_json::from_str::<RawDocument>(&text) {
            Ok(raw) => {
                let document = Document::from_raw(raw, &path);
                Ok(Self { path, document })
            }
            Err(e) => {
                warn!(
                    "Profile store {} is corrupt or invalid ({}), recreating with defaults",
                    path.display(),
                    e
                );
                Self::recreate(path)
            }
        }
    }

    fn recreate(path: PathBuf) -> Result<Self> {
        let store = Self {
            path,
            document: Document::default(),
        };
        store.write()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All readable profiles, ordered by name.
    pub fn profiles(&self) -> &BTreeMap<String, Profile> {
        &self.document.profiles
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.document.profiles.get(name)
    }

    /// Insert or overwrite a profile.
    pub fn save_profile(&mut self, name: &str, profile: Profile) -> Result<()> {
        self.document.unreadable.remove(name);
        self.document.profiles.insert(name.to_string(), profile);
        self.write()?;
        info!("Profile '{}' has been saved", name);
        Ok(())
    }

    /// Remove a profile. Returns `false` if there was none by that name.
    pub fn delete_profile(&mut self, name: &str) -> Result<bool> {
        let removed = self.document.profiles.remove(name).is_some()
            | self.document.unreadable.remove(name).is_some();
        if !removed {
            return Ok(false);
        }
        self.write()?;
        info!("Profile '{}' has been deleted", name);
        Ok(true)
    }

    pub fn app_settings(&self) -> &BTreeMap<String, String> {
        &self.document.app_settings
    }

    /// A single app setting; empty values count as unset.
    pub fn app_setting(&self, key: &str) -> Option<&str> {
        self.document
            .app_settings
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn save_app_setting(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.document
            .app_settings
            .insert(key.to_string(), value.into());
        self.write()
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.document.to_json()?)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_path() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        (dir, path)
    }

    #[test]
    fn test_missing_file_created_with_defaults() {
        let (_dir, path) = store_path();
        let store = ProfileStore::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(store.profiles().len(), 2);
        assert_eq!(store.profile(ACCURATE_PROFILE), Some(&Profile::default()));

        let fast = store.profile(FAST_PROFILE).unwrap();
        assert_eq!(fast.resampler, Engine::Fast);
        assert_eq!(fast.output_format, AudioFormat::Flac);
        assert_eq!(fast.cutoff, 17000.0);

        assert_eq!(store.app_settings().len(), 2);
        assert_eq!(store.app_setting(LAST_INPUT_PATH), None);
    }

    #[test]
    fn test_corrupt_file_recreated() {
        let (_dir, path) = store_path();
        fs::write(&path, "{ not json").unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.profiles().len(), 2);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("_app_settings"));
    }

    #[test]
    fn test_missing_key_recreated() {
        let (_dir, path) = store_path();
        fs::write(&path, r#"{ "profiles": {} }"#).unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert!(store.profile(ACCURATE_PROFILE).is_some());
    }

    #[test]
    fn test_legacy_engine_names_load() {
        let (_dir, path) = store_path();
        fs::write(
            &path,
            r#"{
                "profiles": { "Old": { "resampler": "soxr", "output_format": "flac", "cutoff": 16000 } },
                "_app_settings": { "last_input_path": "/in", "last_output_path": "" }
            }"#,
        )
        .unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.profiles().len(), 1);
        let old = store.profile("Old").unwrap();
        assert_eq!(old.resampler, Engine::Fast);
        assert_eq!(old.cutoff, 16000.0);
        assert_eq!(store.app_setting(LAST_INPUT_PATH), Some("/in"));
    }

    #[test]
    fn test_save_and_delete_persist() {
        let (_dir, path) = store_path();
        let mut store = ProfileStore::open(&path).unwrap();

        let custom = Profile {
            resampler: Engine::Fast,
            output_format: AudioFormat::Wav,
            cutoff: 15000.0,
        };
        store.save_profile("Custom", custom).unwrap();
        store.save_app_setting(LAST_OUTPUT_PATH, "/out").unwrap();

        let reopened = ProfileStore::open(&path).unwrap();
        assert_eq!(reopened.profile("Custom"), Some(&custom));
        assert_eq!(reopened.app_setting(LAST_OUTPUT_PATH), Some("/out"));

        assert!(store.delete_profile("Custom").unwrap());
        assert!(!store.delete_profile("Custom").unwrap());
        assert!(ProfileStore::open(&path).unwrap().profile("Custom").is_none());
    }

    #[test]
    fn test_overwrite_profile() {
        let (_dir, path) = store_path();
        let mut store = ProfileStore::open(&path).unwrap();

        let mut accurate = *store.profile(ACCURATE_PROFILE).unwrap();
        accurate.cutoff = 18000.0;
        store.save_profile(ACCURATE_PROFILE, accurate).unwrap();

        assert_eq!(store.profiles().len(), 2);
        assert_eq!(store.profile(ACCURATE_PROFILE).unwrap().cutoff, 18000.0);
    }

    #[test]
    fn test_bad_entry_skipped_and_kept() {
        let (_dir, path) = store_path();
        fs::write(
            &path,
            r#"{
                "profiles": {
                    "Mine": { "resampler": "scipy", "output_format": "wav", "cutoff": 15000 },
                    "Broken": { "resampler": "soxr", "cutoff": "high" }
                },
                "_app_settings": { "last_input_path": "", "last_output_path": "" }
            }"#,
        )
        .unwrap();

        let mut store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.profiles().len(), 1);
        assert_eq!(store.profile("Mine").unwrap().cutoff, 15000.0);
        assert!(store.profile("Broken").is_none());

        store.save_app_setting(LAST_INPUT_PATH, "/in").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Broken"));
        assert!(text.contains("\"high\""));

        assert!(store.delete_profile("Broken").unwrap());
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("Broken"));
    }

    #[test]
    fn test_default_names_match_existing_files() {
        let (_dir, path) = store_path();
        ProfileStore::open(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"Accurate (Scipy)\""));
        assert!(text.contains("\"Fast (Soxr)\""));
    }
}
