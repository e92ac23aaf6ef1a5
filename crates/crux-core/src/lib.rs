//! Domain layer for crux.
//!
//! Models, traits for the external collaborators (remote store, catalog,
//! local preferences, notifications) and the pure functions that operate on
//! route lists. Nothing here performs I/O.

pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod notification;
pub mod route;
pub mod user;

// Re-export common error type
pub use error::CruxError;
