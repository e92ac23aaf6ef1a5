//! Directory-of-JSON-files `UserDataStore`.
//!
//! Lays documents out on disk exactly like the remote schema:
//!
//! ```text
//! base_dir/
//! └── users/
//!     ├── {userId}.json                     root document
//!     └── {userId}/
//!         ├── ticks/{routeId}.json
//!         ├── bookmarks/{routeId}.json
//!         └── preferences/appearance.json
//! ```

use crate::clock::ServerClock;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crux_core::error::{CruxError, Result};
use crux_core::route::{RouteDocument, RouteInfo, SavedRoute};
use crux_core::user::{
    APPEARANCE_DOCUMENT_ID, AppearancePreference, RouteCollection, UserCollection, UserDataStore,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const EXTENSION: &str = "json";

/// Distinguishes temp files of writes racing on the same document.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The `users/{userId}` root document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    user_id: String,
    created_at: DateTime<Utc>,
}

pub struct JsonDirUserDataStore {
    base_dir: PathBuf,
    clock: ServerClock,
}

impl JsonDirUserDataStore {
    /// Creates a store rooted at `base_dir`, creating the directory.
    pub async fn new(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir.join("users")).await?;
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            clock: ServerClock::new(),
        })
    }

    fn users_dir(&self) -> PathBuf {
        self.base_dir.join("users")
    }

    fn user_document_path(&self, user_id: &str) -> Result<PathBuf> {
        validate_segment("user id", user_id)?;
        Ok(self.users_dir().join(format!("{user_id}.{EXTENSION}")))
    }

    fn collection_dir(&self, user_id: &str, collection: UserCollection) -> Result<PathBuf> {
        validate_segment("user id", user_id)?;
        Ok(self.users_dir().join(user_id).join(collection.as_str()))
    }

    fn document_path(
        &self,
        user_id: &str,
        collection: UserCollection,
        document_id: &str,
    ) -> Result<PathBuf> {
        validate_segment("document id", document_id)?;
        Ok(self
            .collection_dir(user_id, collection)?
            .join(format!("{document_id}.{EXTENSION}")))
    }

    /// Creates the root document unless it exists. Concurrent first writes
    /// for one user race on `create_new`; the loser keeps the winner's file.
    async fn ensure_user_document(&self, user_id: &str, timestamp: DateTime<Utc>) -> Result<()> {
        let path = self.user_document_path(user_id)?;
        if fs::try_exists(&path).await? {
            return Ok(());
        }
        let document = UserDocument {
            user_id: user_id.to_string(),
            created_at: timestamp,
        };
        let json = serde_json::to_string_pretty(&document)?;

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        file.write_all(json.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// True when the root document for `user_id` exists.
    pub async fn has_user_document(&self, user_id: &str) -> Result<bool> {
        Ok(fs::try_exists(self.user_document_path(user_id)?).await?)
    }
}

/// Document and user ids become file names; anything that could escape the
/// collection directory is rejected.
fn validate_segment(kind: &str, value: &str) -> Result<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.contains('\0');
    if invalid {
        return Err(CruxError::data_access(format!("Invalid {kind}: {value:?}")));
    }
    Ok(())
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(value)?;

    let sequence = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let pid = std::process::id();
    let tmp_path = path.with_extension(format!("{EXTENSION}.{pid}.{sequence}.tmp"));
    fs::write(&tmp_path, json).await?;
    fs::rename(&tmp_path, path).await?;
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Document ids (file stems) of every `.json` file in `dir`, sorted.
async fn list_ids(dir: &Path) -> Result<Vec<String>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut ids = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            ids.push(stem.to_string());
        }
    }
    ids.sort();
    Ok(ids)
}

#[async_trait]
impl UserDataStore for JsonDirUserDataStore {
    async fn list_routes(
        &self,
        user_id: &str,
        collection: RouteCollection,
    ) -> Result<Vec<SavedRoute>> {
        let dir = self.collection_dir(user_id, collection.into())?;
        let mut routes = Vec::new();

        for document_id in list_ids(&dir).await? {
            let path = dir.join(format!("{document_id}.{EXTENSION}"));
            match read_json::<RouteDocument>(&path).await {
                Ok(Some(document)) => routes.push(SavedRoute {
                    document_id,
                    document,
                }),
                // deleted between listing and reading
                Ok(None) => {}
                Err(e) => {
                    return Err(CruxError::data_access(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        routes.sort_by(|a, b| {
            b.timestamp()
                .cmp(&a.timestamp())
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        Ok(routes)
    }

    async fn upsert_route(
        &self,
        user_id: &str,
        collection: RouteCollection,
        route: &RouteInfo,
    ) -> Result<SavedRoute> {
        let path = self.document_path(user_id, collection.into(), &route.id)?;
        let timestamp = self.clock.now();
        let document = RouteDocument::from_route(route, timestamp);

        self.ensure_user_document(user_id, timestamp).await?;
        write_json(&path, &document).await?;
        tracing::debug!(
            "[JsonDirUserDataStore] Saved {}/{}/{}",
            user_id,
            collection,
            route.id
        );

        Ok(SavedRoute {
            document_id: route.id.clone(),
            document,
        })
    }

    async fn delete_route(
        &self,
        user_id: &str,
        collection: RouteCollection,
        route_id: &str,
    ) -> Result<()> {
        self.delete_document(user_id, collection.into(), route_id).await
    }

    async fn list_document_ids(
        &self,
        user_id: &str,
        collection: UserCollection,
    ) -> Result<Vec<String>> {
        list_ids(&self.collection_dir(user_id, collection)?).await
    }

    async fn delete_document(
        &self,
        user_id: &str,
        collection: UserCollection,
        document_id: &str,
    ) -> Result<()> {
        let path = self.document_path(user_id, collection, document_id)?;
        remove_if_exists(&path).await
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        remove_if_exists(&self.user_document_path(user_id)?).await?;

        // Prune directories left empty by the sub-collection deletes.
        let user_dir = self.users_dir().join(user_id);
        for collection in UserCollection::ALL {
            let _ = fs::remove_dir(user_dir.join(collection.as_str())).await;
        }
        let _ = fs::remove_dir(&user_dir).await;
        Ok(())
    }

    async fn load_appearance(&self, user_id: &str) -> Result<Option<AppearancePreference>> {
        let path =
            self.document_path(user_id, UserCollection::Preferences, APPEARANCE_DOCUMENT_ID)?;
        read_json(&path).await
    }

    async fn save_appearance(&self, user_id: &str, is_dark_mode: bool) -> Result<()> {
        let path =
            self.document_path(user_id, UserCollection::Preferences, APPEARANCE_DOCUMENT_ID)?;
        let timestamp = self.clock.now();
        self.ensure_user_document(user_id, timestamp).await?;
        write_json(
            &path,
            &AppearancePreference {
                is_dark_mode,
                last_updated: Some(timestamp),
            },
        )
        .await
    }
}
