//! Unified path management for crux files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/crux/              # Config directory
//! ├── config.toml              # Application configuration
//! └── preferences.toml         # Device-local preferences
//!
//! ~/.local/share/crux/         # Data directory
//! ├── routes.json              # Route catalog (default location)
//! ├── store/                   # Local user-data store
//! │   └── users/...
//! └── logs/
//!     └── crux.log.YYYY-MM-DD
//! ```
//!
//! When a base directory is given, both the config and data directory
//! resolve to it. Tests and the `storage.data_dir` setting use this.

use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "crux";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for crux_core::CruxError {
    fn from(err: PathError) -> Self {
        crux_core::CruxError::config(err.to_string())
    }
}

/// Path resolver for crux.
#[derive(Debug, Clone, Default)]
pub struct CruxPaths {
    base_dir: Option<PathBuf>,
}

impl CruxPaths {
    /// Creates a resolver. `None` uses the platform directories.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the crux configuration directory (e.g. `~/.config/crux/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the crux data directory (e.g. `~/.local/share/crux/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn preferences_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("preferences.toml"))
    }

    /// Root of the on-disk user-data store.
    pub fn store_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("store"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }

    /// Resolves the configured catalog file against the data directory.
    pub fn catalog_file(&self, configured: &Path) -> Result<PathBuf, PathError> {
        if configured.is_absolute() {
            Ok(configured.to_path_buf())
        } else {
            Ok(self.data_dir()?.join(configured))
        }
    }
}
