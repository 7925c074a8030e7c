use tracing::debug;
use watch_state_models::MediaType;
use watchroom_config::CatalogConfig;

use crate::error::CatalogError;
use crate::types::{CatalogItem, Genre, GenreList, Paged, SeasonDetails, TitleDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W200,
    W300,
    W500,
    W780,
    Original,
}

impl ImageSize {
    fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }
}

/// Stateless request/response wrapper over the catalog API.
pub struct CatalogClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
}

impl CatalogClient {
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a path (with optional extra query parameters) and decode the body.
    async fn get_json<T>(&self, path: &str, extra_query: &str) -> Result<T, CatalogError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!(
            "{}{}?api_key={}{}",
            self.base_url, path, self.api_key, extra_query
        );
        debug!(path, "catalog request");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }
        Ok(response.json::<T>().await?)
    }

    async fn get_results(&self, path: &str, extra_query: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let page: Paged<CatalogItem> = self.get_json(path, extra_query).await?;
        Ok(page.results)
    }

    pub async fn trending(
        &self,
        media_type: MediaType,
        window: TimeWindow,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.get_results(&format!("/trending/{}/{}", media_type, window.as_str()), "")
            .await
    }

    pub async fn popular(&self, media_type: MediaType) -> Result<Vec<CatalogItem>, CatalogError> {
        self.get_results(&format!("/{}/popular", media_type), "").await
    }

    pub async fn top_rated(&self, media_type: MediaType) -> Result<Vec<CatalogItem>, CatalogError> {
        self.get_results(&format!("/{}/top_rated", media_type), "").await
    }

    pub async fn details(
        &self,
        id: u64,
        media_type: MediaType,
    ) -> Result<TitleDetails, CatalogError> {
        self.get_json(&format!("/{}/{}", media_type, id), "").await
    }

    pub async fn season(&self, tv_id: u64, season_number: u32) -> Result<SeasonDetails, CatalogError> {
        self.get_json(&format!("/tv/{}/season/{}", tv_id, season_number), "")
            .await
    }

    /// Multi search, filtered to the media types the app knows about.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        let extra = format!("&query={}", urlencoding::encode(query));
        let results = self.get_results("/search/multi", &extra).await?;
        Ok(results
            .into_iter()
            .filter(|item| item.media_type.is_some())
            .collect())
    }

    pub async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>, CatalogError> {
        let list: GenreList = self
            .get_json(&format!("/genre/{}/list", media_type), "")
            .await?;
        Ok(list.genres)
    }

    pub async fn discover_by_genre(
        &self,
        media_type: MediaType,
        genre_id: u64,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        let extra = format!("&with_genres={}&sort_by=popularity.desc", genre_id);
        self.get_results(&format!("/discover/{}", media_type), &extra)
            .await
    }

    /// Full image URL for a poster/backdrop reference, or None when absent.
    pub fn image_url(&self, path: Option<&str>, size: ImageSize) -> Option<String> {
        path.map(|p| format!("{}/{}{}", self.image_base_url, size.as_str(), p))
    }
}
