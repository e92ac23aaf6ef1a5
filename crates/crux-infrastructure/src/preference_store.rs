//! TOML-backed local preference store.

use crate::paths::CruxPaths;
use crate::storage::AtomicTomlFile;
use crux_core::error::Result;
use crux_core::user::{LocalPreferenceStore, LocalPreferences};
use std::path::PathBuf;

/// Stores `LocalPreferences` in `preferences.toml`.
pub struct TomlPreferenceStore {
    file: AtomicTomlFile<LocalPreferences>,
}

impl TomlPreferenceStore {
    /// Uses `preferences.toml` in the config directory resolved by `paths`.
    pub fn new(paths: &CruxPaths) -> Result<Self> {
        Ok(Self::with_path(paths.preferences_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }
}

impl LocalPreferenceStore for TomlPreferenceStore {
    fn load(&self) -> Result<LocalPreferences> {
        Ok(self.file.load()?.unwrap_or_default())
    }

    fn save(&self, preferences: &LocalPreferences) -> Result<()> {
        self.file.save(preferences)
    }

    fn update(&self, update: &dyn Fn(&mut LocalPreferences)) -> Result<LocalPreferences> {
        self.file.update(LocalPreferences::default(), |prefs| update(prefs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlPreferenceStore::with_path(temp_dir.path().join("preferences.toml"));

        let prefs = store.load().unwrap();
        assert!(!prefs.is_dark_mode);
        assert!(prefs.notifications_enabled);
    }

    #[test]
    fn test_update_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.toml");
        let store = TomlPreferenceStore::with_path(path.clone());

        store.update(&|prefs: &mut LocalPreferences| prefs.is_dark_mode = true).unwrap();
        store.update(&|prefs: &mut LocalPreferences| prefs.notifications_enabled = false).unwrap();

        let reopened = TomlPreferenceStore::with_path(path);
        let prefs = reopened.load().unwrap();
        assert!(prefs.is_dark_mode);
        assert!(!prefs.notifications_enabled);
    }
}
