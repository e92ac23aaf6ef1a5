//! Milestone notifier that forwards notifications over a channel.
//!
//! The presentation layer owns the receiving end and decides how to show
//! them (OS notification, banner, log line).

use crux_core::error::Result;
use crux_core::notification::{MilestoneNotifier, is_milestone};
use crux_core::user::{LocalPreferenceStore, LocalPreferences};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// A notification ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneNotification {
    /// `milestone_{count}_{unix_seconds}`
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub count: usize,
}

impl MilestoneNotification {
    pub fn new(count: usize) -> Self {
        Self {
            identifier: format!("milestone_{}_{}", count, chrono::Utc::now().timestamp()),
            title: "Congrats on your sends!".to_string(),
            body: format!("You've completed {} climbs.", count),
            count,
        }
    }
}

/// `MilestoneNotifier` that sends `MilestoneNotification`s on an unbounded
/// channel, gated by a persisted on/off switch.
pub struct ChannelMilestoneNotifier {
    enabled: AtomicBool,
    preferences: Option<Arc<dyn LocalPreferenceStore>>,
    sender: mpsc::UnboundedSender<MilestoneNotification>,
}

impl ChannelMilestoneNotifier {
    /// Creates an enabled notifier with no persisted switch.
    pub fn new(sender: mpsc::UnboundedSender<MilestoneNotification>) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            preferences: None,
            sender,
        }
    }

    /// Creates a notifier whose switch is read from and written to
    /// `preferences`. An unreadable preference file leaves it enabled.
    pub fn with_preferences(
        sender: mpsc::UnboundedSender<MilestoneNotification>,
        preferences: Arc<dyn LocalPreferenceStore>,
    ) -> Self {
        let enabled = match preferences.load() {
            Ok(prefs) => prefs.notifications_enabled,
            Err(e) => {
                tracing::warn!(
                    "[MilestoneNotifier] Failed to load notification preference: {}",
                    e
                );
                true
            }
        };

        Self {
            enabled: AtomicBool::new(enabled),
            preferences: Some(preferences),
            sender,
        }
    }

    /// Convenience constructor returning the receiving end as well.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MilestoneNotification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Turns delivery on or off and persists the choice.
    ///
    /// The in-memory switch changes even if persisting fails.
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!("[MilestoneNotifier] Notifications enabled: {}", enabled);

        if let Some(preferences) = &self.preferences {
            preferences
                .update(&|prefs: &mut LocalPreferences| prefs.notifications_enabled = enabled)?;
        }
        Ok(())
    }
}

impl MilestoneNotifier for ChannelMilestoneNotifier {
    fn notify_milestone(&self, count: usize) {
        if !self.is_enabled() || !is_milestone(count) {
            return;
        }

        let notification = MilestoneNotification::new(count);
        tracing::info!(
            "[MilestoneNotifier] {} ({})",
            notification.body,
            notification.identifier
        );

        // Receiver gone means nobody is displaying notifications.
        let _ = self.sender.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference_store::TomlPreferenceStore;
    use tempfile::TempDir;

    #[test]
    fn test_sends_only_milestones() {
        let (notifier, mut receiver) = ChannelMilestoneNotifier::channel();

        notifier.notify_milestone(4);
        notifier.notify_milestone(5);
        notifier.notify_milestone(6);
        notifier.notify_milestone(0);

        let sent = receiver.try_recv().unwrap();
        assert_eq!(sent.count, 5);
        assert_eq!(sent.title, "Congrats on your sends!");
        assert_eq!(sent.body, "You've completed 5 climbs.");
        assert!(sent.identifier.starts_with("milestone_5_"));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_disabled_sends_nothing() {
        let (notifier, mut receiver) = ChannelMilestoneNotifier::channel();
        notifier.set_enabled(false).unwrap();

        notifier.notify_milestone(10);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_switch_is_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.toml");
        let prefs: Arc<dyn LocalPreferenceStore> =
            Arc::new(TomlPreferenceStore::with_path(path.clone()));
        let (sender, _receiver) = mpsc::unbounded_channel();

        let notifier = ChannelMilestoneNotifier::with_preferences(sender.clone(), prefs);
        assert!(notifier.is_enabled());
        notifier.set_enabled(false).unwrap();

        let reloaded = ChannelMilestoneNotifier::with_preferences(
            sender,
            Arc::new(TomlPreferenceStore::with_path(path)),
        );
        assert!(!reloaded.is_enabled());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (notifier, receiver) = ChannelMilestoneNotifier::channel();
        drop(receiver);
        notifier.notify_milestone(5);
    }
}
