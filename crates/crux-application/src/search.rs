//! Route search over the catalog.

use crux_core::error::{CruxError, Result};
use crux_core::route::{RouteCatalog, RouteInfo, filter_routes};
use std::sync::Arc;

const CATALOG_COLLECTION: &str = "routes";

/// Finds catalog routes by name.
pub struct RouteSearchService {
    catalog: Arc<dyn RouteCatalog>,
}

impl RouteSearchService {
    pub fn new(catalog: Arc<dyn RouteCatalog>) -> Self {
        Self { catalog }
    }

    /// Routes whose name contains `query`, ignoring case, in catalog order.
    ///
    /// An empty query returns nothing without touching the catalog. The query
    /// is matched as given, surrounding whitespace included.
    ///
    /// # Errors
    ///
    /// Returns `RemoteLoadFailed` for the `routes` collection if the catalog
    /// cannot be read.
    pub async fn search(&self, query: &str) -> Result<Vec<RouteInfo>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let routes = self.catalog.list_all().await.map_err(|e| {
            tracing::warn!("[RouteSearchService] Failed to load catalog: {}", e);
            CruxError::remote_load(CATALOG_COLLECTION, e)
        })?;
        let matches = filter_routes(&routes, query);
        tracing::debug!(
            "[RouteSearchService] '{}' matched {} of {} routes",
            query,
            matches.len(),
            routes.len()
        );
        Ok(matches)
    }

    /// Looks up a single catalog route.
    pub async fn find_by_id(&self, route_id: &str) -> Result<Option<RouteInfo>> {
        self.catalog
            .find_by_id(route_id)
            .await
            .map_err(|e| CruxError::remote_load(CATALOG_COLLECTION, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockCatalog {
        routes: Vec<RouteInfo>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockCatalog {
        fn new(routes: Vec<RouteInfo>) -> Self {
            Self {
                routes,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RouteCatalog for MockCatalog {
        async fn list_all(&self) -> Result<Vec<RouteInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CruxError::io("catalog offline"));
            }
            Ok(self.routes.clone())
        }
    }

    fn sample() -> Vec<RouteInfo> {
        vec![
            RouteInfo::new("1", "Crack of Doom"),
            RouteInfo::new("2", "Petrified"),
            RouteInfo::new("3", "Doomsday Arete"),
        ]
    }

    #[tokio::test]
    async fn test_search_filters_in_catalog_order() {
        let service = RouteSearchService::new(Arc::new(MockCatalog::new(sample())));

        let found = service.search("DOOM").await.unwrap();

        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_empty_query_skips_catalog() {
        let catalog = Arc::new(MockCatalog::new(sample()));
        let service = RouteSearchService::new(catalog.clone());

        assert!(service.search("").await.unwrap().is_empty());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_is_part_of_the_query() {
        let catalog = Arc::new(MockCatalog::new(sample()));
        let service = RouteSearchService::new(catalog.clone());

        let ids = |routes: Vec<RouteInfo>| -> Vec<String> {
            routes.into_iter().map(|r| r.id).collect()
        };
        assert_eq!(ids(service.search(" ").await.unwrap()), vec!["1", "3"]);
        assert_eq!(ids(service.search(" of").await.unwrap()), vec!["1"]);
        assert!(service.search("Petrified ").await.unwrap().is_empty());
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_catalog_failure_is_remote_load() {
        let mut catalog = MockCatalog::new(sample());
        catalog.fail = true;
        let service = RouteSearchService::new(Arc::new(catalog));

        let err = service.search("doom").await.unwrap_err();

        assert!(matches!(
            &err,
            CruxError::RemoteLoadFailed { collection, .. } if collection == "routes"
        ));
        assert!(service.find_by_id("1").await.unwrap_err().is_remote_load());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let service = RouteSearchService::new(Arc::new(MockCatalog::new(sample())));

        let route = service.find_by_id("2").await.unwrap().unwrap();
        assert_eq!(route.route_name, "Petrified");
        assert!(service.find_by_id("9").await.unwrap().is_none());
    }
}
