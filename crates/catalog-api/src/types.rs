use serde::Deserialize;
use watch_state_models::{ContinueWatchingItem, MediaType, SavedItem};

/// One catalog record as the API returns it. Movies carry `title`, series
/// carry `name`; multi-search results also carry `media_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

impl CatalogItem {
    /// Whichever of `title`/`name` the record carries.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("(untitled)")
    }

    /// The only coupling into the watch-state core: project the fields the
    /// collections need.
    pub fn to_saved_item(&self, media_type: MediaType) -> SavedItem {
        SavedItem {
            id: self.id,
            media_type,
            title: self.display_title().to_string(),
            poster_path: self.poster_path.clone(),
            backdrop_path: self.backdrop_path.clone(),
        }
    }

    pub fn to_continue_watching(
        &self,
        media_type: MediaType,
        progress: u8,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> ContinueWatchingItem {
        ContinueWatchingItem::new(
            self.id,
            media_type,
            self.display_title(),
            self.backdrop_path.clone(),
            progress,
            season,
            episode,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Detail lookup for a single title.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleDetails {
    #[serde(flatten)]
    pub item: CatalogItem,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeSummary {
    pub id: u64,
    pub name: String,
    pub episode_number: u32,
    pub season_number: u32,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub still_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonDetails {
    #[serde(default)]
    pub episodes: Vec<EpisodeSummary>,
}

/// Paged list envelope used by list endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreList {
    #[serde(default = "Vec::new")]
    pub genres: Vec<Genre>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_title_prefers_title_over_name() {
        let json = r#"{"id": 1, "title": "Movie", "name": "Show"}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.display_title(), "Movie");

        let json = r#"{"id": 2, "name": "Show"}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.display_title(), "Show");
    }

    #[test]
    fn test_to_saved_item_projection() {
        let json = r#"{
            "id": 1399,
            "name": "Game of Thrones",
            "overview": "ignored by the core",
            "poster_path": "/p.jpg",
            "backdrop_path": "/b.jpg",
            "vote_average": 8.4,
            "media_type": "tv"
        }"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        let saved = item.to_saved_item(MediaType::Series);

        assert_eq!(saved.id, 1399);
        assert_eq!(saved.media_type, MediaType::Series);
        assert_eq!(saved.title, "Game of Thrones");
        assert_eq!(saved.poster_path.as_deref(), Some("/p.jpg"));
    }

    #[test]
    fn test_to_continue_watching_clamps_progress() {
        let json = r#"{"id": 550, "title": "Fight Club", "backdrop_path": "/b.jpg"}"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        let cw = item.to_continue_watching(MediaType::Movie, 200, None, None);
        assert_eq!(cw.progress, 100);
        assert_eq!(cw.backdrop_path.as_deref(), Some("/b.jpg"));
    }
}
