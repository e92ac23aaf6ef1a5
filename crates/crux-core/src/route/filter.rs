//! Route name filtering.

use super::model::RouteInfo;

/// Returns the routes whose name contains `query`, ignoring case.
///
/// An empty query returns every route. Relative order is preserved.
pub fn filter_routes(routes: &[RouteInfo], query: &str) -> Vec<RouteInfo> {
    if query.is_empty() {
        return routes.to_vec();
    }

    let needle = query.to_lowercase();
    routes
        .iter()
        .filter(|route| route.route_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
