use serde::{Deserialize, Serialize};
use std::fmt;

/// The two per-user route sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCollection {
    Ticks,
    Bookmarks,
}

impl RouteCollection {
    pub const ALL: [RouteCollection; 2] = [RouteCollection::Ticks, RouteCollection::Bookmarks];

    /// Name of the sub-collection under `users/{uid}/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteCollection::Ticks => "ticks",
            RouteCollection::Bookmarks => "bookmarks",
        }
    }
}

impl fmt::Display for RouteCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every sub-collection stored under `users/{uid}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserCollection {
    Ticks,
    Bookmarks,
    Preferences,
}

impl UserCollection {
    pub const ALL: [UserCollection; 3] = [
        UserCollection::Ticks,
        UserCollection::Bookmarks,
        UserCollection::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserCollection::Ticks => "ticks",
            UserCollection::Bookmarks => "bookmarks",
            UserCollection::Preferences => "preferences",
        }
    }
}

impl From<RouteCollection> for UserCollection {
    fn from(collection: RouteCollection) -> Self {
        match collection {
            RouteCollection::Ticks => UserCollection::Ticks,
            RouteCollection::Bookmarks => UserCollection::Bookmarks,
        }
    }
}

impl fmt::Display for UserCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
