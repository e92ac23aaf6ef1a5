//! Configuration service implementation.
//!
//! Loads `CruxConfig` from `config.toml` (default: `~/.config/crux/config.toml`)
//! and caches it. A missing file is created with defaults.

use crate::paths::CruxPaths;
use crate::storage::AtomicTomlFile;
use crux_core::config::CruxConfig;
use crux_core::error::Result;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Configuration service that loads and caches the root configuration.
#[derive(Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<CruxConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `config.toml` from the default config directory.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(CruxPaths::default().config_file()?))
    }

    /// Creates a service reading the given file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A file that cannot be parsed is an error; it is never overwritten.
    pub fn get_config(&self) -> Result<CruxConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = AtomicTomlFile::<CruxConfig>::new(self.path.clone())
            .load_or_create(CruxConfig::default())?;
        tracing::debug!("[ConfigService] Loaded config from {}", self.path.display());

        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(&path);

        let config = service.get_config().unwrap();
        assert_eq!(config, CruxConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_config_is_cached_until_invalidated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[profile]\nrecent_ticks_limit = 4\n").unwrap();
        let service = ConfigService::with_path(&path);

        assert_eq!(service.get_config().unwrap().profile.recent_ticks_limit, 4);

        std::fs::write(&path, "[profile]\nrecent_ticks_limit = 7\n").unwrap();
        assert_eq!(service.get_config().unwrap().profile.recent_ticks_limit, 4);

        service.invalidate_cache();
        assert_eq!(service.get_config().unwrap().profile.recent_ticks_limit, 7);
    }
}
