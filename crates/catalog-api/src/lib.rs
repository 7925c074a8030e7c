pub mod client;
pub mod error;
pub mod types;

pub use client::{CatalogClient, ImageSize, TimeWindow};
pub use error::CatalogError;
pub use types::{CatalogItem, EpisodeSummary, Genre, SeasonDetails, TitleDetails};
