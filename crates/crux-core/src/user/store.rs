//! Remote user-data store trait.

use super::collection::{RouteCollection, UserCollection};
use super::preference::AppearancePreference;
use crate::error::Result;
use crate::route::{RouteInfo, SavedRoute};
use async_trait::async_trait;

/// An abstract document store holding per-user data.
///
/// Mirrors the layout of the managed backend:
///
/// ```text
/// users/{userId}                          root document
/// users/{userId}/ticks/{routeId}          RouteDocument
/// users/{userId}/bookmarks/{routeId}      RouteDocument
/// users/{userId}/preferences/appearance   AppearancePreference
/// ```
///
/// Implementations report their own failures as `DataAccess`, `Io` or
/// `Serialization` errors. Translating those into the route set manager's
/// error kinds happens in the caller.
#[async_trait]
pub trait UserDataStore: Send + Sync {
    /// Lists a route collection, ordered by save timestamp, newest first.
    async fn list_routes(
        &self,
        user_id: &str,
        collection: RouteCollection,
    ) -> Result<Vec<SavedRoute>>;

    /// Writes `route` under its id, replacing any existing document.
    ///
    /// The store assigns the timestamp and creates the root document when
    /// it does not exist yet. Returns what was stored.
    async fn upsert_route(
        &self,
        user_id: &str,
        collection: RouteCollection,
        route: &RouteInfo,
    ) -> Result<SavedRoute>;

    /// Deletes one route document. Deleting a missing document succeeds.
    async fn delete_route(
        &self,
        user_id: &str,
        collection: RouteCollection,
        route_id: &str,
    ) -> Result<()>;

    /// Lists the document ids in any user sub-collection.
    async fn list_document_ids(
        &self,
        user_id: &str,
        collection: UserCollection,
    ) -> Result<Vec<String>>;

    /// Deletes one document from any user sub-collection.
    async fn delete_document(
        &self,
        user_id: &str,
        collection: UserCollection,
        document_id: &str,
    ) -> Result<()>;

    /// Deletes the user's root document. Sub-collections are not touched.
    async fn delete_user(&self, user_id: &str) -> Result<()>;

    /// Reads the appearance preference, if one was saved.
    async fn load_appearance(&self, user_id: &str) -> Result<Option<AppearancePreference>>;

    /// Writes the appearance preference; the store sets `lastUpdated`.
    async fn save_appearance(&self, user_id: &str, is_dark_mode: bool) -> Result<()>;
}
