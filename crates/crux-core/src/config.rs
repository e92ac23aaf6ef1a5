//! Application configuration model (`config.toml`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root of `config.toml`.
///
/// Every section is optional in the file; missing values take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CruxConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub profile: ProfileSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Route catalog file, relative to the data directory unless absolute.
    #[serde(default = "default_catalog_file")]
    pub catalog_file: PathBuf,
}

fn default_catalog_file() -> PathBuf {
    PathBuf::from("routes.json")
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            catalog_file: default_catalog_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// How many ticks the "recent" list shows.
    #[serde(default = "default_recent_ticks_limit")]
    pub recent_ticks_limit: usize,
}

fn default_recent_ticks_limit() -> usize {
    10
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            recent_ticks_limit: default_recent_ticks_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: CruxConfig = toml::from_str("").unwrap();
        assert_eq!(config, CruxConfig::default());
        assert_eq!(config.profile.recent_ticks_limit, 10);
        assert_eq!(config.storage.catalog_file, PathBuf::from("routes.json"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config: CruxConfig = toml::from_str(
            r#"
            [storage]
            data_dir = "/tmp/crux"

            [profile]
            recent_ticks_limit = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/crux")));
        assert_eq!(config.storage.catalog_file, PathBuf::from("routes.json"));
        assert_eq!(config.profile.recent_ticks_limit, 3);
    }
}
