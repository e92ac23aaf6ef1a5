//! State owned by the route set manager.

use crux_core::route::RouteInfo;
use crux_core::user::RouteCollection;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Signed-in user and the two route collections.
///
/// `generation` changes on every session start and end. Async work captures
/// it before awaiting and applies its result only if it is still current.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub generation: u64,
    pub user_id: Option<String>,
    pub ticked: Vec<RouteInfo>,
    pub bookmarked: Vec<RouteInfo>,
    pub is_dark_mode: bool,
}

impl SessionState {
    pub fn new(is_dark_mode: bool) -> Self {
        Self {
            is_dark_mode,
            ..Self::default()
        }
    }

    pub fn routes(&self, collection: RouteCollection) -> &Vec<RouteInfo> {
        match collection {
            RouteCollection::Ticks => &self.ticked,
            RouteCollection::Bookmarks => &self.bookmarked,
        }
    }

    fn routes_mut(&mut self, collection: RouteCollection) -> &mut Vec<RouteInfo> {
        match collection {
            RouteCollection::Ticks => &mut self.ticked,
            RouteCollection::Bookmarks => &mut self.bookmarked,
        }
    }

    pub fn contains(&self, collection: RouteCollection, route_id: &str) -> bool {
        self.routes(collection).iter().any(|route| route.id == route_id)
    }

    /// Sets a new user with empty collections and returns the new generation.
    pub fn begin_session(&mut self, user_id: String) -> u64 {
        self.generation += 1;
        self.user_id = Some(user_id);
        self.ticked.clear();
        self.bookmarked.clear();
        self.generation
    }

    /// Drops the user and everything loaded for them.
    pub fn end_session(&mut self) -> u64 {
        self.generation += 1;
        self.user_id = None;
        self.ticked.clear();
        self.bookmarked.clear();
        self.is_dark_mode = false;
        self.generation
    }

    /// Replaces a collection, dropping repeated ids (first occurrence wins).
    pub fn replace(&mut self, collection: RouteCollection, routes: Vec<RouteInfo>) -> usize {
        let mut seen = HashSet::new();
        let target = self.routes_mut(collection);
        target.clear();
        target.extend(routes.into_iter().filter(|route| seen.insert(route.id.clone())));
        target.len()
    }

    /// Puts `route` at the front, removing any older copy.
    pub fn insert_front(&mut self, collection: RouteCollection, route: RouteInfo) -> usize {
        let target = self.routes_mut(collection);
        target.retain(|existing| existing.id != route.id);
        target.insert(0, route);
        target.len()
    }

    pub fn remove(&mut self, collection: RouteCollection, route_id: &str) -> usize {
        let target = self.routes_mut(collection);
        target.retain(|existing| existing.id != route_id);
        target.len()
    }
}

/// Routes with a toggle currently waiting on the remote store.
#[derive(Debug, Default)]
pub(crate) struct InFlightSet {
    routes: Mutex<HashSet<(RouteCollection, String)>>,
}

impl InFlightSet {
    /// Marks the route busy. Returns `None` when it already is.
    pub fn try_acquire(
        &self,
        collection: RouteCollection,
        route_id: &str,
    ) -> Option<InFlightGuard<'_>> {
        let key = (collection, route_id.to_string());
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        if !routes.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard { set: self, key })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Releases the route when dropped, whatever way the toggle ended.
pub(crate) struct InFlightGuard<'a> {
    set: &'a InFlightSet,
    key: (RouteCollection, String),
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
