//! In-memory `UserDataStore`.

use crate::clock::ServerClock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crux_core::error::Result;
use crux_core::route::{RouteDocument, RouteInfo, SavedRoute};
use crux_core::user::{
    APPEARANCE_DOCUMENT_ID, AppearancePreference, RouteCollection, UserCollection, UserDataStore,
};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone)]
struct UserRecord {
    created_at: Option<DateTime<Utc>>,
    ticks: HashMap<String, RouteDocument>,
    bookmarks: HashMap<String, RouteDocument>,
    appearance: Option<AppearancePreference>,
}

impl UserRecord {
    fn routes(&self, collection: RouteCollection) -> &HashMap<String, RouteDocument> {
        match collection {
            RouteCollection::Ticks => &self.ticks,
            RouteCollection::Bookmarks => &self.bookmarks,
        }
    }

    fn routes_mut(&mut self, collection: RouteCollection) -> &mut HashMap<String, RouteDocument> {
        match collection {
            RouteCollection::Ticks => &mut self.ticks,
            RouteCollection::Bookmarks => &mut self.bookmarks,
        }
    }

    fn is_empty(&self) -> bool {
        self.created_at.is_none()
            && self.ticks.is_empty()
            && self.bookmarks.is_empty()
            && self.appearance.is_none()
    }
}

/// A `UserDataStore` kept entirely in memory.
///
/// Used by tests and demos. Documents can be seeded with explicit
/// timestamps to set up ordering scenarios.
#[derive(Debug, Default)]
pub struct InMemoryUserDataStore {
    users: RwLock<HashMap<String, UserRecord>>,
    clock: ServerClock,
}

impl InMemoryUserDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `route` with the given timestamp, bypassing the clock.
    pub async fn seed_route(
        &self,
        user_id: &str,
        collection: RouteCollection,
        route: &RouteInfo,
        timestamp: DateTime<Utc>,
    ) {
        let mut users = self.users.write().await;
        let record = users.entry(user_id.to_string()).or_default();
        record.created_at.get_or_insert(timestamp);
        record
            .routes_mut(collection)
            .insert(
                route.id.clone(),
                RouteDocument::from_route(route, timestamp),
            );
    }

    /// True when the store holds nothing at all for `user_id`.
    pub async fn is_user_empty(&self, user_id: &str) -> bool {
        let users = self.users.read().await;
        users.get(user_id).is_none_or(UserRecord::is_empty)
    }

    /// True when the root document for `user_id` exists.
    pub async fn has_user_document(&self, user_id: &str) -> bool {
        let users = self.users.read().await;
        users
            .get(user_id)
            .is_some_and(|record| record.created_at.is_some())
    }
}

fn sort_newest_first(routes: &mut [SavedRoute]) {
    routes.sort_by(|a, b| {
        b.timestamp()
            .cmp(&a.timestamp())
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
}

#[async_trait]
impl UserDataStore for InMemoryUserDataStore {
    async fn list_routes(
        &self,
        user_id: &str,
        collection: RouteCollection,
    ) -> Result<Vec<SavedRoute>> {
        let users = self.users.read().await;
        let mut routes: Vec<SavedRoute> = users
            .get(user_id)
            .map(|record| {
                record
                    .routes(collection)
                    .iter()
                    .map(|(id, document)| SavedRoute {
                        document_id: id.clone(),
                        document: document.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        sort_newest_first(&mut routes);
        Ok(routes)
    }

    async fn upsert_route(
        &self,
        user_id: &str,
        collection: RouteCollection,
        route: &RouteInfo,
    ) -> Result<SavedRoute> {
        let timestamp = self.clock.now();
        let document = RouteDocument::from_route(route, timestamp);

        let mut users = self.users.write().await;
        let record = users.entry(user_id.to_string()).or_default();
        record.created_at.get_or_insert(timestamp);
        record
            .routes_mut(collection)
            .insert(route.id.clone(), document.clone());

        Ok(SavedRoute {
            document_id: route.id.clone(),
            document,
        })
    }

    async fn delete_route(
        &self,
        user_id: &str,
        collection: RouteCollection,
        route_id: &str,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        if let Some(record) = users.get_mut(user_id) {
            record.routes_mut(collection).remove(route_id);
        }
        Ok(())
    }

    async fn list_document_ids(
        &self,
        user_id: &str,
        collection: UserCollection,
    ) -> Result<Vec<String>> {
        let users = self.users.read().await;
        let Some(record) = users.get(user_id) else {
            return Ok(Vec::new());
        };

        let mut ids: Vec<String> = match collection {
            UserCollection::Ticks => record.ticks.keys().cloned().collect(),
            UserCollection::Bookmarks => record.bookmarks.keys().cloned().collect(),
            UserCollection::Preferences => record
                .appearance
                .iter()
                .map(|_| APPEARANCE_DOCUMENT_ID.to_string())
                .collect(),
        };
        ids.sort();
        Ok(ids)
    }

    async fn delete_document(
        &self,
        user_id: &str,
        collection: UserCollection,
        document_id: &str,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let Some(record) = users.get_mut(user_id) else {
            return Ok(());
        };

        match collection {
            UserCollection::Ticks => {
                record.ticks.remove(document_id);
            }
            UserCollection::Bookmarks => {
                record.bookmarks.remove(document_id);
            }
            UserCollection::Preferences => {
                if document_id == APPEARANCE_DOCUMENT_ID {
                    record.appearance = None;
                }
            }
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let mut users = self.users.write().await;
        let now_empty = match users.get_mut(user_id) {
            Some(record) => {
                record.created_at = None;
                record.is_empty()
            }
            None => false,
        };
        if now_empty {
            users.remove(user_id);
        }
        Ok(())
    }

    async fn load_appearance(&self, user_id: &str) -> Result<Option<AppearancePreference>> {
        let users = self.users.read().await;
        Ok(users
            .get(user_id)
            .and_then(|record| record.appearance.clone()))
    }

    async fn save_appearance(&self, user_id: &str, is_dark_mode: bool) -> Result<()> {
        let timestamp = self.clock.now();
        let mut users = self.users.write().await;
        let record = users.entry(user_id.to_string()).or_default();
        record.created_at.get_or_insert(timestamp);
        record.appearance = Some(AppearancePreference {
            is_dark_mode,
            last_updated: Some(timestamp),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let store = InMemoryUserDataStore::new();
        let t1 = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 11, 2, 0, 0, 0).unwrap();

        store
            .seed_route("u1", RouteCollection::Ticks, &RouteInfo::new("b", "B"), t1)
            .await;
        store
            .seed_route("u1", RouteCollection::Ticks, &RouteInfo::new("a", "A"), t2)
            .await;

        let ids: Vec<String> = store
            .list_routes("u1", RouteCollection::Ticks)
            .await
            .unwrap()
            .into_iter()
            .map(|saved| saved.document_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_collections_are_separate() {
        let store = InMemoryUserDataStore::new();
        let route = RouteInfo::new("r1", "Route One");

        store.upsert_route("u1", RouteCollection::Ticks, &route).await.unwrap();
        store.upsert_route("u1", RouteCollection::Ticks, &route).await.unwrap();

        assert_eq!(
            store.list_routes("u1", RouteCollection::Ticks).await.unwrap().len(),
            1
        );
        assert!(store.list_routes("u1", RouteCollection::Bookmarks).await.unwrap().is_empty());
        assert!(store.has_user_document("u1").await);
    }

    #[tokio::test]
    async fn test_delete_everything_leaves_user_empty() {
        let store = InMemoryUserDataStore::new();
        store
            .upsert_route("u1", RouteCollection::Bookmarks, &RouteInfo::new("r1", "R"))
            .await
            .unwrap();
        store.save_appearance("u1", true).await.unwrap();

        for collection in UserCollection::ALL {
            for id in store.list_document_ids("u1", collection).await.unwrap() {
                store.delete_document("u1", collection, &id).await.unwrap();
            }
        }
        store.delete_user("u1").await.unwrap();

        assert!(store.is_user_empty("u1").await);
        assert!(store.load_appearance("u1").await.unwrap().is_none());
    }
}
