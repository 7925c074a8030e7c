use std::sync::Arc;

use catalog_api::{CatalogClient, TitleDetails};
use color_eyre::Result;
use watch_state_core::{FileStateStore, StreamingContext};
use watch_state_models::MediaType;
use watchroom_config::{Config, PathManager};

pub mod catalog;
pub mod config;
pub mod library;
pub mod play;

/// Open the on-disk watch state and wait for the initial load.
pub(crate) async fn open_context(paths: &PathManager) -> StreamingContext {
    let store = Arc::new(FileStateStore::new(paths.data_dir()));
    let mut ctx = StreamingContext::new(store);
    ctx.init().await;
    ctx
}

/// Look a title up in the catalog, for commands invoked without `--title`.
pub(crate) async fn lookup_details(
    config: &Config,
    id: u64,
    media_type: MediaType,
) -> Result<TitleDetails> {
    let client = CatalogClient::from_config(&config.catalog)?;
    Ok(client.details(id, media_type).await?)
}
