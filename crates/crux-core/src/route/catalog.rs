//! Route catalog trait.

use super::model::RouteInfo;
use crate::error::Result;
use async_trait::async_trait;

/// Read-only access to the `routes` catalog.
///
/// The catalog is searched by fetching everything and filtering on the
/// client, so implementations only need a full listing and a keyed lookup.
#[async_trait]
pub trait RouteCatalog: Send + Sync {
    /// Returns every route in the catalog.
    async fn list_all(&self) -> Result<Vec<RouteInfo>>;

    /// Finds one route by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(RouteInfo))`: Route found
    /// - `Ok(None)`: No route with this id
    /// - `Err(_)`: The catalog could not be read
    async fn find_by_id(&self, route_id: &str) -> Result<Option<RouteInfo>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .find(|route| route.id == route_id))
    }
}
