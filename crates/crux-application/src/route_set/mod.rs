//! Per-user route collections.
//!
//! `RouteSetManager` holds the signed-in user's ticks, bookmarks and theme
//! flag, and is the only place they are changed.

mod manager;
mod state;

pub use manager::{RouteSetManager, ToggleOutcome};
