use super::state::{InFlightSet, SessionState};
use crux_core::error::{CruxError, Result};
use crux_core::event::RouteSetEvent;
use crux_core::notification::{MilestoneNotifier, is_milestone};
use crux_core::route::{RouteInfo, SavedRoute, TickStats};
use crux_core::user::{
    LocalPreferenceStore, LocalPreferences, RouteCollection, UserCollection, UserDataStore,
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Result of a tick or bookmark toggle that reached the remote store, or
/// was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The route was stored and is now at the front of the collection.
    Added,
    /// The route was deleted and is no longer in the collection.
    Removed,
    /// A toggle of the same route was still waiting on the store; nothing
    /// was done.
    InFlight,
    /// The remote call succeeded but the session ended (or changed user)
    /// meanwhile, so local state was left alone.
    Stale,
}

/// Owns the signed-in user's ticks, bookmarks and theme flag.
///
/// `RouteSetManager` is the only writer of this state. Route toggles are
/// remote-first: the collection changes only after the store call succeeds.
/// Theme changes are optimistic: the in-memory flag changes first and the
/// writes follow.
///
/// Every successful mutation is published as a [`RouteSetEvent`] to
/// receivers obtained from [`RouteSetManager::subscribe`].
pub struct RouteSetManager {
    state: RwLock<SessionState>,
    in_flight: InFlightSet,
    store: Arc<dyn UserDataStore>,
    preferences: Arc<dyn LocalPreferenceStore>,
    notifier: Arc<dyn MilestoneNotifier>,
    events: broadcast::Sender<RouteSetEvent>,
}

impl RouteSetManager {
    /// Creates a signed-out manager. The theme flag starts from the locally
    /// persisted value.
    pub fn new(
        store: Arc<dyn UserDataStore>,
        preferences: Arc<dyn LocalPreferenceStore>,
        notifier: Arc<dyn MilestoneNotifier>,
    ) -> Self {
        let is_dark_mode = match preferences.load() {
            Ok(prefs) => prefs.is_dark_mode,
            Err(e) => {
                tracing::warn!("[RouteSetManager] Failed to load local preferences: {}", e);
                false
            }
        };
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            state: RwLock::new(SessionState::new(is_dark_mode)),
            in_flight: InFlightSet::default(),
            store,
            preferences,
            notifier,
            events,
        }
    }

    /// Returns a receiver for state change events.
    pub fn subscribe(&self) -> broadcast::Receiver<RouteSetEvent> {
        self.events.subscribe()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_local_theme(&self, is_dark_mode: bool) {
        let result = self
            .preferences
            .update(&|prefs: &mut LocalPreferences| prefs.is_dark_mode = is_dark_mode);
        if let Err(e) = result {
            tracing::warn!("[RouteSetManager] Failed to store theme locally: {}", e);
        }
    }

    fn publish(&self, event: RouteSetEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// The signed-in user and the current generation.
    fn current_session(&self) -> Result<(String, u64)> {
        let state = self.read_state();
        let user_id = state.user_id.clone().ok_or(CruxError::NotAuthenticated)?;
        Ok((user_id, state.generation))
    }

    // ============================================================================
    // Session lifecycle
    // ============================================================================

    /// Starts a session for `user_id` and loads its data.
    ///
    /// Both collections are emptied before the loads begin. Ticks, bookmarks
    /// and the appearance preference load concurrently; a failed load leaves
    /// its part empty and is logged.
    ///
    /// # Errors
    ///
    /// Returns the first `RemoteLoadFailed` if any load failed. Loads that
    /// succeeded are applied regardless.
    pub async fn on_session_start(&self, user_id: impl Into<String>) -> Result<()> {
        let user_id = user_id.into();
        let generation = self.write_state().begin_session(user_id.clone());
        tracing::info!(
            "[RouteSetManager] Session started: user_id={}, generation={}",
            user_id,
            generation
        );
        self.publish(RouteSetEvent::SessionStarted {
            user_id: user_id.clone(),
        });

        let (ticks, bookmarks, appearance) = tokio::join!(
            self.store.list_routes(&user_id, RouteCollection::Ticks),
            self.store.list_routes(&user_id, RouteCollection::Bookmarks),
            self.store.load_appearance(&user_id)
        );

        let mut first_error = None;
        for (collection, result) in [
            (RouteCollection::Ticks, ticks),
            (RouteCollection::Bookmarks, bookmarks),
        ] {
            if let Err(e) = self.apply_load(generation, collection, result) {
                first_error.get_or_insert(e);
            }
        }

        match appearance {
            Ok(Some(preference)) => self.apply_remote_theme(generation, preference.is_dark_mode),
            Ok(None) => {
                tracing::debug!("[RouteSetManager] No remote appearance for {}", user_id);
            }
            Err(e) => {
                tracing::warn!("[RouteSetManager] Failed to load appearance: {}", e);
                first_error.get_or_insert(CruxError::remote_load(
                    UserCollection::Preferences.as_str(),
                    e,
                ));
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Ends the session immediately.
    ///
    /// Clears the user, both collections and the theme flag (persisting
    /// not-dark locally). Remote calls still outstanding will find the
    /// generation changed and leave the cleared state alone.
    pub fn on_session_end(&self) {
        let generation = self.write_state().end_session();
        tracing::info!("[RouteSetManager] Session ended: generation={}", generation);

        self.store_local_theme(false);
        self.publish(RouteSetEvent::SessionCleared);
    }

    /// Reloads both collections for the current session.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` with no session.
    /// - The first `RemoteLoadFailed`; a collection that failed to load keeps
    ///   its previous contents.
    pub async fn refresh(&self) -> Result<()> {
        let (user_id, generation) = self.current_session()?;
        tracing::debug!("[RouteSetManager] refresh() for user_id={}", user_id);

        let (ticks, bookmarks) = tokio::join!(
            self.store.list_routes(&user_id, RouteCollection::Ticks),
            self.store.list_routes(&user_id, RouteCollection::Bookmarks)
        );

        let tick_result = self.apply_load(generation, RouteCollection::Ticks, ticks);
        let bookmark_result = self.apply_load(generation, RouteCollection::Bookmarks, bookmarks);
        tick_result.and(bookmark_result)
    }

    fn apply_load(
        &self,
        generation: u64,
        collection: RouteCollection,
        result: Result<Vec<SavedRoute>>,
    ) -> Result<()> {
        let saved = result.map_err(|e| {
            tracing::warn!("[RouteSetManager] Failed to load {}: {}", collection, e);
            CruxError::remote_load(collection.as_str(), e)
        })?;

        let routes: Vec<RouteInfo> = saved.into_iter().map(SavedRoute::into_route).collect();
        let count = {
            let mut state = self.write_state();
            if state.generation != generation {
                tracing::debug!(
                    "[RouteSetManager] Dropping stale {} load (generation {})",
                    collection,
                    generation
                );
                return Ok(());
            }
            state.replace(collection, routes)
        };

        tracing::debug!("[RouteSetManager] Loaded {} {}", count, collection);
        self.publish(RouteSetEvent::CollectionLoaded { collection, count });
        Ok(())
    }

    fn apply_remote_theme(&self, generation: u64, is_dark_mode: bool) {
        {
            let mut state = self.write_state();
            if state.generation != generation {
                return;
            }
            state.is_dark_mode = is_dark_mode;
        }

        self.store_local_theme(is_dark_mode);
        self.publish(RouteSetEvent::ThemeChanged { is_dark_mode });
    }

    // ============================================================================
    // Toggles
    // ============================================================================

    /// Adds `route` to the ticks if absent, removes it otherwise.
    ///
    /// A successful add that brings the tick count to a multiple of five
    /// notifies the milestone notifier and publishes `Milestone`.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` with no session; the store is not called.
    /// - `RemoteWriteFailed` if the store call fails; nothing changes locally.
    pub async fn toggle_tick(&self, route: &RouteInfo) -> Result<ToggleOutcome> {
        self.toggle(RouteCollection::Ticks, route).await
    }

    /// Adds `route` to the bookmarks if absent, removes it otherwise.
    ///
    /// Same errors as [`RouteSetManager::toggle_tick`].
    pub async fn toggle_bookmark(&self, route: &RouteInfo) -> Result<ToggleOutcome> {
        self.toggle(RouteCollection::Bookmarks, route).await
    }

    async fn toggle(
        &self,
        collection: RouteCollection,
        route: &RouteInfo,
    ) -> Result<ToggleOutcome> {
        if self.read_state().user_id.is_none() {
            return Err(CruxError::NotAuthenticated);
        }

        let Some(_guard) = self.in_flight.try_acquire(collection, &route.id) else {
            tracing::debug!(
                "[RouteSetManager] Ignoring toggle of {} in {}: already in flight",
                route.id,
                collection
            );
            return Ok(ToggleOutcome::InFlight);
        };

        // Membership is read under the guard so a toggle that just released it
        // has already committed its change.
        let (user_id, generation, present) = {
            let state = self.read_state();
            let user_id = state.user_id.clone().ok_or(CruxError::NotAuthenticated)?;
            (user_id, state.generation, state.contains(collection, &route.id))
        };

        if present {
            self.remove_route(&user_id, generation, collection, route).await
        } else {
            self.add_route(&user_id, generation, collection, route).await
        }
    }

    async fn add_route(
        &self,
        user_id: &str,
        generation: u64,
        collection: RouteCollection,
        route: &RouteInfo,
    ) -> Result<ToggleOutcome> {
        self.store
            .upsert_route(user_id, collection, route)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "[RouteSetManager] Failed to add {} to {}: {}",
                    route.id,
                    collection,
                    e
                );
                CruxError::remote_write(collection.as_str(), e)
            })?;

        let (count, grew) = {
            let mut state = self.write_state();
            if state.generation != generation {
                tracing::debug!(
                    "[RouteSetManager] Session changed while adding {}; discarding",
                    route.id
                );
                return Ok(ToggleOutcome::Stale);
            }
            let before = state.routes(collection).len();
            let after = state.insert_front(collection, route.clone());
            (after, after > before)
        };

        tracing::info!(
            "[RouteSetManager] Added {} to {} (count={})",
            route.id,
            collection,
            count
        );
        self.publish(RouteSetEvent::RouteAdded {
            collection,
            route_id: route.id.clone(),
            count,
        });

        if collection == RouteCollection::Ticks && grew && is_milestone(count) {
            self.notifier.notify_milestone(count);
            self.publish(RouteSetEvent::Milestone { count });
        }

        Ok(ToggleOutcome::Added)
    }

    async fn remove_route(
        &self,
        user_id: &str,
        generation: u64,
        collection: RouteCollection,
        route: &RouteInfo,
    ) -> Result<ToggleOutcome> {
        self.store
            .delete_route(user_id, collection, &route.id)
            .await
            .map_err(|e| {
                tracing::warn!(
                    "[RouteSetManager] Failed to remove {} from {}: {}",
                    route.id,
                    collection,
                    e
                );
                CruxError::remote_write(collection.as_str(), e)
            })?;

        let count = {
            let mut state = self.write_state();
            if state.generation != generation {
                return Ok(ToggleOutcome::Stale);
            }
            state.remove(collection, &route.id)
        };

        tracing::info!(
            "[RouteSetManager] Removed {} from {} (count={})",
            route.id,
            collection,
            count
        );
        self.publish(RouteSetEvent::RouteRemoved {
            collection,
            route_id: route.id.clone(),
            count,
        });
        Ok(ToggleOutcome::Removed)
    }

    // ============================================================================
    // Theme
    // ============================================================================

    /// Sets the theme flag.
    ///
    /// The in-memory flag changes and `ThemeChanged` is published before
    /// anything is written. The value is then stored locally and, when
    /// signed in, remotely. A failed write is not rolled back.
    ///
    /// # Errors
    ///
    /// Returns `RemoteWriteFailed` if the remote write fails. A failed local
    /// write is only logged.
    pub async fn set_dark_mode(&self, is_dark_mode: bool) -> Result<()> {
        let user_id = {
            let mut state = self.write_state();
            state.is_dark_mode = is_dark_mode;
            state.user_id.clone()
        };
        self.publish(RouteSetEvent::ThemeChanged { is_dark_mode });

        self.store_local_theme(is_dark_mode);

        if let Some(user_id) = user_id {
            self.store
                .save_appearance(&user_id, is_dark_mode)
                .await
                .map_err(|e| {
                    tracing::warn!("[RouteSetManager] Failed to store theme remotely: {}", e);
                    CruxError::remote_write(UserCollection::Preferences.as_str(), e)
                })?;
        }
        Ok(())
    }

    // ============================================================================
    // Account data
    // ============================================================================

    /// Deletes everything stored for the signed-in user.
    ///
    /// Every document in ticks, bookmarks and preferences is deleted, then
    /// the user's root document. Each deletion is attempted even if earlier
    /// ones failed. On full success the session is ended.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated` with no session.
    /// - `AggregateDeleteFailed` holding every failure; the session and
    ///   local collections are kept so the call can be retried.
    pub async fn delete_all_user_data(&self) -> Result<()> {
        let (user_id, generation) = self.current_session()?;
        tracing::info!(
            "[RouteSetManager] Deleting all data for user_id={}",
            user_id
        );

        let mut failures = Vec::new();
        for collection in UserCollection::ALL {
            let document_ids = match self.store.list_document_ids(&user_id, collection).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!("[RouteSetManager] Failed to list {}: {}", collection, e);
                    failures.push(CruxError::remote_load(collection.as_str(), e));
                    continue;
                }
            };

            for document_id in document_ids {
                if let Err(e) = self
                    .store
                    .delete_document(&user_id, collection, &document_id)
                    .await
                {
                    tracing::warn!(
                        "[RouteSetManager] Failed to delete {}/{}: {}",
                        collection,
                        document_id,
                        e
                    );
                    failures.push(CruxError::remote_write(collection.as_str(), e));
                }
            }
        }

        if let Err(e) = self.store.delete_user(&user_id).await {
            tracing::warn!("[RouteSetManager] Failed to delete user document: {}", e);
            failures.push(CruxError::remote_write("users", e));
        }

        if !failures.is_empty() {
            return Err(CruxError::AggregateDeleteFailed(failures));
        }

        let unchanged = self.read_state().generation == generation;
        if unchanged {
            self.on_session_end();
        }
        Ok(())
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    /// Ticked routes, most recent first.
    pub fn ticked_routes(&self) -> Vec<RouteInfo> {
        self.read_state().ticked.clone()
    }

    /// Bookmarked routes, most recent first.
    pub fn bookmarked_routes(&self) -> Vec<RouteInfo> {
        self.read_state().bookmarked.clone()
    }

    pub fn ticked_count(&self) -> usize {
        self.read_state().ticked.len()
    }

    pub fn is_ticked(&self, route_id: &str) -> bool {
        self.read_state().contains(RouteCollection::Ticks, route_id)
    }

    pub fn is_bookmarked(&self, route_id: &str) -> bool {
        self.read_state().contains(RouteCollection::Bookmarks, route_id)
    }

    pub fn user_id(&self) -> Option<String> {
        self.read_state().user_id.clone()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.read_state().is_dark_mode
    }

    /// Profile statistics over the current ticks.
    pub fn tick_stats(&self, recent_limit: usize) -> TickStats {
        TickStats::from_routes(&self.read_state().ticked, recent_limit)
    }
}
