use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use watch_state_models::{MediaType, SavedItem};

use crate::store::StateStore;

/// Deduplicated, insertion-ordered list of saved titles.
///
/// The in-memory list is the source of truth for all reads; every mutation
/// updates it synchronously and then queues a fire-and-forget persist of the
/// whole record. A failed persist leaves memory and disk divergent until the
/// next successful write; `is_degraded` reports that condition.
pub struct WatchlistManager {
    items: Vec<SavedItem>,
    store: Arc<dyn StateStore>,
    save_seq: Arc<AtomicU64>,
    degraded: Arc<AtomicBool>,
    last_persist: Option<tokio::task::JoinHandle<()>>,
}

impl WatchlistManager {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            items: Vec::new(),
            store,
            save_seq: Arc::new(AtomicU64::new(0)),
            degraded: Arc::new(AtomicBool::new(false)),
            last_persist: None,
        }
    }

    /// Replace the in-memory list with loaded state. Does not persist.
    pub fn replace(&mut self, items: Vec<SavedItem>) {
        self.items = items;
    }

    /// Append an item unless one with the same identity is already present.
    /// Returns whether the list changed.
    pub fn add(&mut self, item: SavedItem) -> bool {
        if self.contains(item.id, item.media_type) {
            debug!("Watchlist already contains {} ({})", item.id, item.media_type);
            return false;
        }
        self.items.push(item);
        self.queue_persist();
        true
    }

    /// Remove the entry matching `(id, type)`, if any. Returns whether the
    /// list changed.
    pub fn remove(&mut self, id: u64, media_type: MediaType) -> bool {
        let before = self.items.len();
        self.items
            .retain(|i| !(i.id == id && i.media_type == media_type));
        if self.items.len() == before {
            return false;
        }
        self.queue_persist();
        true
    }

    /// Pure lookup, no I/O.
    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.items
            .iter()
            .any(|i| i.id == id && i.media_type == media_type)
    }

    pub fn items(&self) -> &[SavedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True while the last persist failed and no later one has succeeded.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Wait for the most recently queued persist. Callers that are about to
    /// exit the process use this; UI-driven sessions never need to.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.last_persist.take() {
            let _ = handle.await;
        }
    }

    fn queue_persist(&mut self) {
        let items = self.items.clone();
        let store = Arc::clone(&self.store);
        let degraded = Arc::clone(&self.degraded);
        let seq = self.save_seq.fetch_add(1, Ordering::Relaxed) + 1;
        // Chain onto the previous persist so two saves of the same record
        // never interleave and land in issuance order.
        let previous = self.last_persist.take();
        self.last_persist = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            match store.save_watchlist(&items).await {
                Ok(()) => {
                    degraded.store(false, Ordering::Relaxed);
                    debug!(seq, "Watchlist persisted ({} items)", items.len());
                }
                Err(e) => {
                    degraded.store(true, Ordering::Relaxed);
                    warn!(seq, "Watchlist persist failed: {}", e);
                }
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStateStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;
    use watch_state_models::ContinueWatchingItem;

    fn saved(id: u64, title: &str) -> SavedItem {
        SavedItem {
            id,
            media_type: MediaType::Movie,
            title: title.to_string(),
            poster_path: None,
            backdrop_path: None,
        }
    }

    /// Store double that reports every persisted watchlist over a channel.
    struct RecordingStore {
        saves: Mutex<mpsc::UnboundedSender<Vec<SavedItem>>>,
    }

    impl RecordingStore {
        fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Vec<SavedItem>>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Arc::new(Self {
                    saves: Mutex::new(tx),
                }),
                rx,
            )
        }
    }

    #[async_trait]
    impl StateStore for RecordingStore {
        async fn load_watchlist(&self) -> Vec<SavedItem> {
            Vec::new()
        }

        async fn load_continue_watching(&self) -> Vec<ContinueWatchingItem> {
            Vec::new()
        }

        async fn save_watchlist(&self, items: &[SavedItem]) -> Result<(), crate::StoreError> {
            let tx = self.saves.lock().unwrap().clone();
            let _ = tx.send(items.to_vec());
            Ok(())
        }

        async fn save_continue_watching(
            &self,
            _items: &[ContinueWatchingItem],
        ) -> Result<(), crate::StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (store, _rx) = RecordingStore::new();
        let mut manager = WatchlistManager::new(store);

        assert!(manager.add(saved(1, "One")));
        assert!(!manager.add(saved(1, "One again")));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.items()[0].title, "One");
    }

    #[tokio::test]
    async fn test_duplicate_add_does_not_reorder() {
        let (store, _rx) = RecordingStore::new();
        let mut manager = WatchlistManager::new(store);

        manager.add(saved(1, "One"));
        manager.add(saved(2, "Two"));
        manager.add(saved(1, "One"));

        let ids: Vec<u64> = manager.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_remove_only_affects_matching_identity() {
        let (store, _rx) = RecordingStore::new();
        let mut manager = WatchlistManager::new(store);

        manager.add(saved(1, "One"));
        manager.add(saved(2, "Two"));
        let mut series = saved(1, "One, the series");
        series.media_type = MediaType::Series;
        manager.add(series);

        assert!(manager.remove(1, MediaType::Movie));
        assert!(!manager.contains(1, MediaType::Movie));
        assert!(manager.contains(2, MediaType::Movie));
        assert!(manager.contains(1, MediaType::Series));

        // Removing an absent identity is a no-op.
        assert!(!manager.remove(99, MediaType::Movie));
    }

    #[tokio::test]
    async fn test_mutation_persists_whole_record() {
        let (store, mut rx) = RecordingStore::new();
        let mut manager = WatchlistManager::new(store);

        manager.add(saved(1, "One"));
        manager.add(saved(2, "Two"));

        // Saves arrive in issuance order, each carrying the full record.
        let first = rx.recv().await.unwrap();
        assert_eq!(first.len(), 1);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].id, 2);
    }

    #[tokio::test]
    async fn test_write_failure_sets_degraded_and_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the data directory should be makes every write fail.
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "").unwrap();

        let store = Arc::new(FileStateStore::new(&blocker));
        let mut manager = WatchlistManager::new(store);

        assert!(manager.add(saved(1, "One")));
        // In-memory state is unaffected by the failed persist.
        assert_eq!(manager.len(), 1);

        // Let the spawned save run to completion.
        manager.flush().await;
        assert!(manager.is_degraded());
    }
}
