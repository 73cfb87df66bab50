//! Path utilities for codeassist data directories.

use std::path::PathBuf;

/// Preference file name.
pub const PREFERENCES_FILE_NAME: &str = "style_preferences.json";

/// Get the codeassist data directory (~/.codeassist/).
///
/// Falls back to the working directory when no home directory is known.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".codeassist"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the preferences directory (~/.codeassist/preferences/).
pub fn preferences_dir() -> PathBuf {
    data_dir().join("preferences")
}

/// Get the default preference file path.
pub fn preferences_file() -> PathBuf {
    preferences_dir().join(PREFERENCES_FILE_NAME)
}
