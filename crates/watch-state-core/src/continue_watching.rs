use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use watch_state_models::{ContinueWatchingItem, MediaType};

use crate::store::StateStore;

/// Capacity of the continue-watching shelf.
pub const MAX_ENTRIES: usize = 10;

/// Ordered, bounded, deduplicated record of in-progress playback.
///
/// Ordering is recency of insertion: only a fresh `upsert` moves an entry to
/// the front, reads never reorder. The list is truncated to [`MAX_ENTRIES`]
/// after every upsert, dropping the least recently upserted entries.
pub struct ContinueWatchingTracker {
    items: Vec<ContinueWatchingItem>,
    store: Arc<dyn StateStore>,
    save_seq: Arc<AtomicU64>,
    degraded: Arc<AtomicBool>,
    last_persist: Option<tokio::task::JoinHandle<()>>,
}

impl ContinueWatchingTracker {
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
    pub fn replace(&mut self, mut items: Vec<ContinueWatchingItem>) {
        items.truncate(MAX_ENTRIES);
        self.items = items;
    }

    /// Remove any entry with the same identity, prepend the new one, then
    /// truncate to capacity.
    pub fn upsert(&mut self, item: ContinueWatchingItem) {
        let key = item.key();
        self.items.retain(|i| i.key() != key);
        self.items.insert(0, item);
        self.items.truncate(MAX_ENTRIES);
        self.queue_persist();
    }

    pub fn get(&self, id: u64, media_type: MediaType) -> Option<&ContinueWatchingItem> {
        self.items
            .iter()
            .find(|i| i.id == id && i.media_type == media_type)
    }

    pub fn items(&self) -> &[ContinueWatchingItem] {
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
            match store.save_continue_watching(&items).await {
                Ok(()) => {
                    degraded.store(false, Ordering::Relaxed);
                    debug!(seq, "Continue-watching persisted ({} items)", items.len());
                }
                Err(e) => {
                    degraded.store(true, Ordering::Relaxed);
                    warn!(seq, "Continue-watching persist failed: {}", e);
                }
            }
        }));
    }
}
