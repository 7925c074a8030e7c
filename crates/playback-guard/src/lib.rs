pub mod blocklist;
pub mod dom;
pub mod engine;
pub mod host;
pub mod surface;

pub use blocklist::{BlockList, NavigationDecision, BLOCKED_DOMAINS};
pub use engine::{ContentFilterEngine, SWEEP_INTERVAL};
pub use host::{stream_url, LoadGeneration, LoadState, PlaybackHost};
pub use surface::{EmbeddedSurface, RequestError, RequestFn};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if a panicking holder poisoned it.
pub(crate) fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
