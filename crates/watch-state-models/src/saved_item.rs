use serde::{Deserialize, Serialize};

use crate::media::{MediaKey, MediaType};

/// A title the user saved to their watchlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
}

impl SavedItem {
    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.id, self.media_type)
    }
}
