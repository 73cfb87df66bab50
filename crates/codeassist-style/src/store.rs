//! JSON file store for style preferences.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::error::PreferenceError;
use crate::paths;
use crate::preferences::StylePreferences;

/// Style preference store backed by a single JSON file.
///
/// Reads never fail: a missing or corrupt file yields the default record.
/// Writes are serialized through an in-process lock and land atomically (temp
/// file then rename), so a reader never observes a half-written record.
pub struct PreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    /// Create a store for the given file. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store at the default location.
    pub fn open_default() -> Self {
        Self::new(paths::preferences_file())
    }

    /// Get the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences, falling back to defaults.
    pub fn load(&self) -> StylePreferences {
        match self.try_load() {
            Ok(Some(prefs)) => prefs,
            Ok(None) => {
                debug!("No preference file at {}, using defaults", self.path.display());
                StylePreferences::default()
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable preference file {}: {}",
                    self.path.display(),
                    e
                );
                StylePreferences::default()
            }
        }
    }

    /// Load preferences, reporting what went wrong. `Ok(None)` if the file does
    /// not exist.
    pub fn try_load(&self) -> Result<Option<StylePreferences>, PreferenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PreferenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        StylePreferences::from_json(&content).map(Some)
    }

    /// Persist preferences.
    pub fn save(&self, prefs: &StylePreferences) -> Result<(), PreferenceError> {
        prefs.validate()?;
        let content = serde_json::to_string_pretty(prefs)?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PreferenceError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, content).map_err(|source| PreferenceError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!("Saved style preferences to {}", self.path.display());
        Ok(())
    }

    /// Write the default record if no file exists yet, then load.
    pub fn init(&self) -> Result<StylePreferences, PreferenceError> {
        if !self.path.exists() {
            self.save(&StylePreferences::default())?;
        }
        Ok(self.load())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "preferences".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }
}
