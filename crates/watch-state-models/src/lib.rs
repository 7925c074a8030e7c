pub mod continue_watching;
pub mod media;
pub mod saved_item;

pub use continue_watching::{ContinueWatchingItem, PROGRESS_MAX};
pub use media::{MediaKey, MediaType};
pub use saved_item::SavedItem;
