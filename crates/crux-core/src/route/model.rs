//! Route domain models.
//!
//! `RouteInfo` is the value every other component passes around.
//! `RouteDocument` and `CatalogRoute` are the two stored shapes a route is
//! read from: the per-user tick/bookmark document and the route catalog
//! document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One climbing route.
///
/// Immutable once constructed; `id` is the key used by the remote store and
/// stays stable across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub id: String,
    pub route_name: String,
    /// Discipline, e.g. "sport" or "trad".
    pub type_string: String,
    pub parent_sector: String,
    /// Mean user rating, conventionally within 0..=5.
    pub mean_rating: f64,
    /// Difficulty code (YDS).
    pub grade: String,
    pub state: String,
    /// Free text straight from the data import. See
    /// [`crate::route::display::clean_list_text`] before showing it.
    pub description: String,
    pub location: String,
    pub num_votes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety: Option<String>,
}

impl RouteInfo {
    /// Creates a route with only an id and a name; all other fields empty.
    pub fn new(id: impl Into<String>, route_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            route_name: route_name.into(),
            type_string: String::new(),
            parent_sector: String::new(),
            mean_rating: 0.0,
            grade: String::new(),
            state: String::new(),
            description: String::new(),
            location: String::new(),
            num_votes: 0,
            safety: None,
        }
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into();
        self
    }

    pub fn with_type(mut self, type_string: impl Into<String>) -> Self {
        self.type_string = type_string.into();
        self
    }

    pub fn with_area(mut self, state: impl Into<String>, parent_sector: impl Into<String>) -> Self {
        self.state = state.into();
        self.parent_sector = parent_sector.into();
        self
    }

    pub fn with_rating(mut self, mean_rating: f64, num_votes: u32) -> Self {
        self.mean_rating = mean_rating;
        self.num_votes = num_votes;
        self
    }
}

/// The document stored under `users/{uid}/ticks/{routeId}` and
/// `users/{uid}/bookmarks/{routeId}`.
///
/// Every field decodes leniently: strings default to empty, numbers to zero.
/// `safety` is not part of this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    #[serde(default)]
    pub route_name: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub type_string: String,
    #[serde(default)]
    pub parent_sector: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub mean_rating: f64,
    #[serde(default)]
    pub num_votes: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// Assigned by the store at write time.
    pub timestamp: DateTime<Utc>,
}

impl RouteDocument {
    /// Builds the document written for `route`, stamped with `timestamp`.
    pub fn from_route(route: &RouteInfo, timestamp: DateTime<Utc>) -> Self {
        Self {
            route_id: Some(route.id.clone()),
            route_name: route.route_name.clone(),
            grade: route.grade.clone(),
            type_string: route.type_string.clone(),
            parent_sector: route.parent_sector.clone(),
            state: route.state.clone(),
            mean_rating: route.mean_rating,
            num_votes: route.num_votes,
            description: route.description.clone(),
            location: route.location.clone(),
            timestamp,
        }
    }

    /// Converts back into a `RouteInfo`. `document_id` is used when the
    /// document carries no `route_id` of its own.
    pub fn into_route(self, document_id: &str) -> RouteInfo {
        RouteInfo {
            id: self.route_id.unwrap_or_else(|| document_id.to_string()),
            route_name: self.route_name,
            type_string: self.type_string,
            parent_sector: self.parent_sector,
            mean_rating: self.mean_rating,
            grade: self.grade,
            state: self.state,
            description: self.description,
            location: self.location,
            num_votes: self.num_votes,
            safety: None,
        }
    }
}

/// A stored route document together with its key.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRoute {
    pub document_id: String,
    pub document: RouteDocument,
}

impl SavedRoute {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.document.timestamp
    }

    pub fn into_route(self) -> RouteInfo {
        self.document.into_route(&self.document_id)
    }
}

/// A document of the read-only `routes` catalog. The key is the route id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRoute {
    #[serde(default)]
    pub route_name: String,
    #[serde(default)]
    pub type_string: String,
    #[serde(default)]
    pub parent_sector: String,
    #[serde(default)]
    pub mean_rating: f64,
    #[serde(default, rename = "nopm_YDS")]
    pub grade: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub num_votes: u32,
    #[serde(default)]
    pub safety: String,
}

impl CatalogRoute {
    pub fn into_route(self, id: impl Into<String>) -> RouteInfo {
        RouteInfo {
            id: id.into(),
            route_name: self.route_name,
            type_string: self.type_string,
            parent_sector: self.parent_sector,
            mean_rating: self.mean_rating,
            grade: self.grade,
            state: self.state,
            description: self.description,
            location: self.location,
            num_votes: self.num_votes,
            safety: (!self.safety.is_empty()).then_some(self.safety),
        }
    }
}
