//! Route domain module.
//!
//! # Module Structure
//!
//! - `model`: `RouteInfo` and its stored document shapes
//! - `filter`: name search over a route list
//! - `stats`: grade distribution and recent ticks
//! - `display`: text cleanup and formatting for presentation
//! - `catalog`: read-only route catalog trait

pub mod catalog;
pub mod display;
pub mod filter;
mod model;
pub mod stats;

pub use catalog::RouteCatalog;
pub use filter::filter_routes;
pub use model::{CatalogRoute, RouteDocument, RouteInfo, SavedRoute};
pub use stats::{GradeCount, TickStats};
