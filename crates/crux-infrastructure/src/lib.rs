//! Infrastructure layer for crux.
//!
//! Concrete implementations of the collaborator traits defined in
//! `crux-core`: user-data stores, the route catalog, local preferences,
//! configuration loading and milestone notification delivery.

pub mod catalog;
pub mod clock;
pub mod config_service;
pub mod json_dir_store;
pub mod memory_store;
pub mod notification;
pub mod paths;
pub mod preference_store;
pub mod storage;

pub use catalog::{InMemoryRouteCatalog, JsonRouteCatalog};
pub use config_service::ConfigService;
pub use json_dir_store::JsonDirUserDataStore;
pub use memory_store::InMemoryUserDataStore;
pub use notification::{ChannelMilestoneNotifier, MilestoneNotification};
pub use paths::CruxPaths;
pub use preference_store::TomlPreferenceStore;
