use crate::user::RouteCollection;
use serde::{Deserialize, Serialize};

/// Change notifications published by the route set manager after each
/// successful mutation of the state it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteSetEvent {
    /// A user signed in; both collections are empty until loaded.
    SessionStarted { user_id: String },
    /// A collection was replaced by a load from the remote store.
    CollectionLoaded {
        collection: RouteCollection,
        count: usize,
    },
    RouteAdded {
        collection: RouteCollection,
        route_id: String,
        count: usize,
    },
    RouteRemoved {
        collection: RouteCollection,
        route_id: String,
        count: usize,
    },
    ThemeChanged { is_dark_mode: bool },
    /// The tick count reached a multiple of the milestone interval.
    Milestone { count: usize },
    /// The session ended; all user state was cleared.
    SessionCleared,
}
