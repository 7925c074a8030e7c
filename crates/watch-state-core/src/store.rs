use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use watch_state_models::{ContinueWatchingItem, SavedItem};

use crate::error::StoreError;

/// Record key for the saved-titles list.
pub const WATCHLIST_KEY: &str = "watchlist";
/// Record key for the in-progress list.
pub const CONTINUE_WATCHING_KEY: &str = "continueWatching";

/// Durable key/value storage for the two watch-state records.
///
/// Loads are best effort and never fail the caller: a missing key or a
/// payload that no longer deserializes comes back as an empty list with a
/// diagnostic. Saves report their failure so the spawning task can log it,
/// but nothing retries.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load_watchlist(&self) -> Vec<SavedItem>;
    async fn load_continue_watching(&self) -> Vec<ContinueWatchingItem>;
    async fn save_watchlist(&self, items: &[SavedItem]) -> Result<(), StoreError>;
    async fn save_continue_watching(
        &self,
        items: &[ContinueWatchingItem],
    ) -> Result<(), StoreError>;
}

/// Both records as loaded in one pass.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub watchlist: Vec<SavedItem>,
    pub continue_watching: Vec<ContinueWatchingItem>,
}

/// Fetch both records concurrently.
pub async fn load_snapshot(store: &dyn StateStore) -> Snapshot {
    let (watchlist, continue_watching) =
        tokio::join!(store.load_watchlist(), store.load_continue_watching());
    Snapshot {
        watchlist,
        continue_watching,
    }
}

/// File-backed store: one JSON array per record under the data directory.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    data_dir: PathBuf,
}

impl FileStateStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    async fn load_record<T>(&self, key: &'static str) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        let path = self.record_path(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Record {} does not exist yet, starting empty", key);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read record {}: {}. Starting empty.", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&content) {
            Ok(items) => {
                debug!("Loaded record {} ({} items)", key, items.len());
                items
            }
            Err(e) => {
                warn!(
                    "Record {} is corrupt: {}. Starting empty; the next save overwrites it.",
                    key, e
                );
                Vec::new()
            }
        }
    }

    async fn save_record<T>(&self, key: &'static str, items: &[T]) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StoreError::Write {
                record: key,
                source,
            })?;

        let json = serde_json::to_string_pretty(items).map_err(|source| {
            StoreError::Serialize {
                record: key,
                source,
            }
        })?;

        // Write to a temp file then rename, so a failed write never leaves a
        // partially serialized record behind.
        let path = self.record_path(key);
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|source| StoreError::Write {
                record: key,
                source,
            })?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|source| StoreError::Write {
                record: key,
                source,
            })?;

        debug!("Saved record {} ({} items)", key, items.len());
        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load_watchlist(&self) -> Vec<SavedItem> {
        self.load_record(WATCHLIST_KEY).await
    }

    async fn load_continue_watching(&self) -> Vec<ContinueWatchingItem> {
        self.load_record(CONTINUE_WATCHING_KEY).await
    }

    async fn save_watchlist(&self, items: &[SavedItem]) -> Result<(), StoreError> {
        self.save_record(WATCHLIST_KEY, items).await
    }

    async fn save_continue_watching(
        &self,
        items: &[ContinueWatchingItem],
    ) -> Result<(), StoreError> {
        self.save_record(CONTINUE_WATCHING_KEY, items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watch_state_models::MediaType;

    fn saved(id: u64, title: &str) -> SavedItem {
        SavedItem {
            id,
            media_type: MediaType::Movie,
            title: title.to_string(),
            poster_path: Some(format!("/poster/{}.jpg", id)),
            backdrop_path: None,
        }
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());

        let watchlist = vec![saved(1, "One"), saved(2, "Two")];
        let watching = vec![ContinueWatchingItem::new(
            3,
            MediaType::Series,
            "Three",
            Some("/b.jpg".to_string()),
            55,
            Some(1),
            Some(2),
        )];

        store.save_watchlist(&watchlist).await.unwrap();
        store.save_continue_watching(&watching).await.unwrap();

        let snapshot = load_snapshot(&store).await;
        assert_eq!(snapshot.watchlist, watchlist);
        assert_eq!(snapshot.continue_watching, watching);
    }

    #[tokio::test]
    async fn test_empty_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());

        store.save_watchlist(&[]).await.unwrap();
        let snapshot = load_snapshot(&store).await;
        assert!(snapshot.watchlist.is_empty());
        assert!(snapshot.continue_watching.is_empty());
    }

    #[tokio::test]
    async fn test_missing_records_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nonexistent"));

        let snapshot = load_snapshot(&store).await;
        assert!(snapshot.watchlist.is_empty());
        assert!(snapshot.continue_watching.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_record_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());

        std::fs::write(dir.path().join("watchlist.json"), "{not json").unwrap();
        assert!(store.load_watchlist().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_whole_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());

        store.save_watchlist(&[saved(1, "One"), saved(2, "Two")]).await.unwrap();
        store.save_watchlist(&[saved(2, "Two")]).await.unwrap();

        let loaded = store.load_watchlist().await;
        assert_eq!(loaded, vec![saved(2, "Two")]);

        // No temp file left behind after the rename.
        assert!(!dir.path().join("watchlist.json.tmp").exists());
    }
}
