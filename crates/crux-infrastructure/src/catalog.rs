//! Route catalog implementations.

use async_trait::async_trait;
use crux_core::error::{CruxError, Result};
use crux_core::route::{CatalogRoute, RouteCatalog, RouteInfo};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Reads the catalog from a JSON object keyed by route id:
///
/// ```json
/// { "105": { "route_name": "Petrified", "nopm_YDS": "5.10d", ... } }
/// ```
///
/// The file is read on every call; the catalog is small and rarely changes.
pub struct JsonRouteCatalog {
    path: PathBuf,
}

impl JsonRouteCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RouteCatalog for JsonRouteCatalog {
    async fn list_all(&self) -> Result<Vec<RouteInfo>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CruxError::io(format!(
                "Failed to read route catalog {}: {}",
                self.path.display(),
                e
            ))
        })?;

        // BTreeMap keeps the listing in key order across runs.
        let documents: BTreeMap<String, CatalogRoute> = serde_json::from_str(&content)?;
        tracing::debug!(
            "[JsonRouteCatalog] Loaded {} routes from {}",
            documents.len(),
            self.path.display()
        );

        Ok(documents
            .into_iter()
            .map(|(id, document)| document.into_route(id))
            .collect())
    }
}

/// A fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRouteCatalog {
    routes: Vec<RouteInfo>,
}

impl InMemoryRouteCatalog {
    pub fn new(routes: Vec<RouteInfo>) -> Self {
        Self { routes }
    }
}

#[async_trait]
impl RouteCatalog for InMemoryRouteCatalog {
    async fn list_all(&self) -> Result<Vec<RouteInfo>> {
        Ok(self.routes.clone())
    }
}
