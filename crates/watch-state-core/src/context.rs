use std::sync::Arc;
use tracing::info;

use crate::continue_watching::ContinueWatchingTracker;
use crate::store::{load_snapshot, StateStore};
use crate::watchlist::WatchlistManager;

/// App-wide watch-state service.
///
/// Constructed explicitly and injected where needed; `init` performs the
/// initial concurrent load of both records. There is no teardown beyond
/// process exit.
pub struct StreamingContext {
    store: Arc<dyn StateStore>,
    pub watchlist: WatchlistManager,
    pub continue_watching: ContinueWatchingTracker,
    loading: bool,
}

impl StreamingContext {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            watchlist: WatchlistManager::new(Arc::clone(&store)),
            continue_watching: ContinueWatchingTracker::new(Arc::clone(&store)),
            store,
            loading: true,
        }
    }

    /// Load both records and populate the managers.
    pub async fn init(&mut self) {
        let snapshot = load_snapshot(self.store.as_ref()).await;
        info!(
            "Watch state loaded: {} saved, {} in progress",
            snapshot.watchlist.len(),
            snapshot.continue_watching.len()
        );
        self.watchlist.replace(snapshot.watchlist);
        self.continue_watching.replace(snapshot.continue_watching);
        self.loading = false;
    }

    /// True until the initial load has completed.
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileStateStore;
    use watch_state_models::{ContinueWatchingItem, MediaType, SavedItem};

    #[tokio::test]
    async fn test_init_populates_managers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path());

        store
            .save_watchlist(&[SavedItem {
                id: 1,
                media_type: MediaType::Movie,
                title: "One".to_string(),
                poster_path: None,
                backdrop_path: None,
            }])
            .await
            .unwrap();
        store
            .save_continue_watching(&[ContinueWatchingItem::new(
                2,
                MediaType::Series,
                "Two",
                None,
                30,
                Some(1),
                Some(3),
            )])
            .await
            .unwrap();

        let mut ctx = StreamingContext::new(Arc::new(store));
        assert!(ctx.is_loading());
        ctx.init().await;
        assert!(!ctx.is_loading());
        assert!(ctx.watchlist.contains(1, MediaType::Movie));
        assert_eq!(ctx.continue_watching.len(), 1);
    }

    #[tokio::test]
    async fn test_first_run_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = StreamingContext::new(Arc::new(FileStateStore::new(dir.path())));
        ctx.init().await;
        assert!(ctx.watchlist.is_empty());
        assert!(ctx.continue_watching.is_empty());
    }
}
