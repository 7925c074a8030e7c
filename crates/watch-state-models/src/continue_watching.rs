use serde::{Deserialize, Serialize};

use crate::media::{MediaKey, MediaType};

/// Upper bound for playback progress, in percent.
pub const PROGRESS_MAX: u8 = 100;

/// An in-progress title shown on the continue-watching shelf.
///
/// `season`/`episode` are only meaningful for series; movies leave them
/// unset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContinueWatchingItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl ContinueWatchingItem {
    /// Build an entry, clamping progress to the 0..=100 range.
    pub fn new(
        id: u64,
        media_type: MediaType,
        title: impl Into<String>,
        backdrop_path: Option<String>,
        progress: u8,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Self {
        Self {
            id,
            media_type,
            title: title.into(),
            backdrop_path,
            progress: progress.min(PROGRESS_MAX),
            season,
            episode,
        }
    }

    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.id, self.media_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_clamped_to_bound() {
        let item = ContinueWatchingItem::new(7, MediaType::Movie, "X", None, 250, None, None);
        assert_eq!(item.progress, PROGRESS_MAX);

        let item = ContinueWatchingItem::new(7, MediaType::Movie, "X", None, 42, None, None);
        assert_eq!(item.progress, 42);
    }

    #[test]
    fn test_series_wire_format_carries_season_episode() {
        let item = ContinueWatchingItem::new(
            1399,
            MediaType::Series,
            "Game of Thrones",
            Some("/backdrop.jpg".to_string()),
            65,
            Some(2),
            Some(4),
        );

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"tv\""));
        assert!(json.contains("\"season\":2"));
        assert!(json.contains("\"episode\":4"));

        let parsed: ContinueWatchingItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_movie_wire_format_omits_season_episode() {
        let item = ContinueWatchingItem::new(550, MediaType::Movie, "Fight Club", None, 10, None, None);
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("season"));
        assert!(!json.contains("episode"));
    }
}
