//! Preference models and the local preference store trait.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document id of the appearance preference inside `users/{uid}/preferences`.
pub const APPEARANCE_DOCUMENT_ID: &str = "appearance";

/// The remote appearance document (`users/{uid}/preferences/appearance`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppearancePreference {
    #[serde(rename = "isDarkMode")]
    pub is_dark_mode: bool,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Preferences persisted on the device, independent of any signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPreferences {
    /// Theme used while signed out and until the remote value arrives.
    #[serde(default)]
    pub is_dark_mode: bool,
    /// Whether milestone notifications are delivered.
    #[serde(default = "default_notifications_enabled")]
    pub notifications_enabled: bool,
}

fn default_notifications_enabled() -> bool {
    true
}

impl Default for LocalPreferences {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            notifications_enabled: default_notifications_enabled(),
        }
    }
}

/// Device-local preference storage.
///
/// Synchronous: implementations read and write a small local file.
pub trait LocalPreferenceStore: Send + Sync {
    /// Loads the stored preferences, or defaults when nothing is stored.
    fn load(&self) -> Result<LocalPreferences>;

    /// Replaces the stored preferences.
    fn save(&self, preferences: &LocalPreferences) -> Result<()>;

    /// Loads, applies `update`, and saves.
    fn update(&self, update: &dyn Fn(&mut LocalPreferences)) -> Result<LocalPreferences> {
        let mut preferences = self.load()?;
        update(&mut preferences);
        self.save(&preferences)?;
        Ok(preferences)
    }
}
