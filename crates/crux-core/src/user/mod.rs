//! User data module.
//!
//! Everything stored per user: the tick and bookmark collections, the
//! appearance preference, and the device-local preference file.
//!
//! # Module Structure
//!
//! - `collection`: names of the per-user sub-collections
//! - `store`: remote user-data store trait
//! - `preference`: appearance and local preference models

mod collection;
mod preference;
mod store;

pub use collection::{RouteCollection, UserCollection};
pub use preference::{
    APPEARANCE_DOCUMENT_ID, AppearancePreference, LocalPreferenceStore, LocalPreferences,
};
pub use store::UserDataStore;
