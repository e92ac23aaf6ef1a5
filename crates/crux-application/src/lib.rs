//! Application layer for crux.
//!
//! Coordinates the domain types in `crux-core` with whatever store, catalog
//! and notifier implementations the binary wires in.

pub mod auth_listener;
pub mod route_set;
pub mod search;

pub use auth_listener::spawn_auth_listener;
pub use route_set::{RouteSetManager, ToggleOutcome};
pub use search::RouteSearchService;
