//! Composition root: builds the services every command runs against.

use anyhow::{Context, Result, bail};
use crux_application::{RouteSearchService, RouteSetManager};
use crux_core::config::CruxConfig;
use crux_core::error::CruxError;
use crux_core::notification::MilestoneNotifier;
use crux_core::route::RouteInfo;
use crux_core::user::{LocalPreferenceStore, UserDataStore};
use crux_infrastructure::{
    ChannelMilestoneNotifier, CruxPaths, JsonDirUserDataStore, JsonRouteCatalog,
    MilestoneNotification, TomlPreferenceStore,
};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct AppContext {
    pub config: CruxConfig,
    pub manager: Arc<RouteSetManager>,
    pub search: RouteSearchService,
    pub notifier: Arc<ChannelMilestoneNotifier>,
    pub json: bool,
    user: Option<String>,
    notifications: mpsc::UnboundedReceiver<MilestoneNotification>,
}

impl AppContext {
    pub async fn build(
        config: CruxConfig,
        paths: &CruxPaths,
        user: Option<String>,
        json: bool,
    ) -> Result<Self> {
        let store_dir = paths.store_dir()?;
        let store: Arc<dyn UserDataStore> = Arc::new(
            JsonDirUserDataStore::new(&store_dir)
                .await
                .with_context(|| format!("Failed to open store at {}", store_dir.display()))?,
        );
        let preferences: Arc<dyn LocalPreferenceStore> =
            Arc::new(TomlPreferenceStore::new(paths)?);

        let (sender, notifications) = mpsc::unbounded_channel();
        let notifier = Arc::new(ChannelMilestoneNotifier::with_preferences(
            sender,
            preferences.clone(),
        ));
        let milestone_notifier: Arc<dyn MilestoneNotifier> = notifier.clone();

        let manager = Arc::new(RouteSetManager::new(store, preferences, milestone_notifier));
        let catalog_file = paths.catalog_file(&config.storage.catalog_file)?;
        let search = RouteSearchService::new(Arc::new(JsonRouteCatalog::new(catalog_file)));

        Ok(Self {
            config,
            manager,
            search,
            notifier,
            json,
            user,
            notifications,
        })
    }

    /// Signs in the `--user` given on the command line, failing when none was.
    ///
    /// A collection that fails to load stays empty; the failure is logged and
    /// reported on stderr and the command carries on with what did load.
    pub async fn require_session(&self) -> Result<()> {
        let Some(user) = &self.user else {
            bail!("This command needs a user: pass --user <UID> or set CRUX_USER");
        };
        match self.manager.on_session_start(user.clone()).await {
            Ok(()) => Ok(()),
            Err(CruxError::NotAuthenticated) => Err(CruxError::NotAuthenticated.into()),
            Err(e) => {
                tracing::warn!("[AppContext] Partial load for user '{}': {}", user, e);
                eprintln!("warning: {e}; continuing with the data that loaded");
                Ok(())
            }
        }
    }

    /// Signs in when a user was given; otherwise stays signed out.
    pub async fn optional_session(&self) -> Result<()> {
        if self.user.is_some() {
            self.require_session().await?;
        }
        Ok(())
    }

    pub async fn find_route(&self, route_id: &str) -> Result<RouteInfo> {
        match self.search.find_by_id(route_id).await? {
            Some(route) => Ok(route),
            None => Err(CruxError::not_found("route", route_id).into()),
        }
    }

    /// Notifications produced so far by the milestone notifier.
    pub fn drain_notifications(&mut self) -> Vec<MilestoneNotification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    async fn context(base: &Path, user: Option<&str>) -> AppContext {
        let paths = CruxPaths::new(Some(base));
        AppContext::build(
            CruxConfig::default(),
            &paths,
            user.map(str::to_string),
            false,
        )
        .await
        .unwrap()
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_document_does_not_block_session() {
        let temp_dir = TempDir::new().unwrap();
        let user_dir = temp_dir.path().join("store/users/u1");
        write(&user_dir.join("preferences/appearance.json"), "{ not json");
        write(&user_dir.join("bookmarks/105.json"), r#"{"route_id": 105}"#);

        let ctx = context(temp_dir.path(), Some("u1")).await;
        ctx.require_session().await.unwrap();

        assert_eq!(ctx.manager.user_id().as_deref(), Some("u1"));
        assert!(ctx.manager.bookmarked_routes().is_empty());
        assert!(ctx.manager.ticked_routes().is_empty());
    }

    #[tokio::test]
    async fn test_session_needs_user() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(temp_dir.path(), None).await;

        assert!(ctx.require_session().await.is_err());
        ctx.optional_session().await.unwrap();
        assert!(ctx.manager.user_id().is_none());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir.path().join("routes.json"), "{}");
        let ctx = context(temp_dir.path(), None).await;

        let err = ctx.find_route("999").await.unwrap_err();
        let err = err.downcast_ref::<CruxError>().unwrap();
        assert!(err.is_not_found());
    }
}
