pub mod context;
pub mod continue_watching;
pub mod error;
pub mod store;
pub mod watchlist;

pub use context::StreamingContext;
pub use continue_watching::{ContinueWatchingTracker, MAX_ENTRIES};
pub use error::StoreError;
pub use store::{load_snapshot, FileStateStore, Snapshot, StateStore};
pub use watchlist::WatchlistManager;
