use color_eyre::Result;
use playback_guard::{stream_url, BlockList, LoadState, PlaybackHost};
use tracing::info;
use watch_state_models::{ContinueWatchingItem, MediaType};
use watchroom_config::{Config, PathManager};

use crate::output::{Output, OutputFormat};

pub async fn run_play(
    paths: &PathManager,
    config: &Config,
    output: &Output,
    id: u64,
    media_type: MediaType,
    season: Option<u32>,
    episode: Option<u32>,
) -> Result<()> {
    let url = stream_url(&config.player.base_url, id, media_type, season, episode);
    info!(id, %media_type, url, "Starting playback");

    let mut host = PlaybackHost::new(BlockList::standard());
    let Some(generation) = host.load(&url) else {
        output.warn(format!("Refused to load {}: blocked domain", url));
        return Ok(());
    };
    host.notify_load_started(generation);
    // There is no embedded webview here, so the load completes immediately.
    host.notify_load_ended(generation);
    debug_assert_eq!(host.state(), LoadState::Ready);

    if output.format() == OutputFormat::Human {
        output.success(format!("Player ready: {}", url));
    } else {
        output.json(&serde_json::json!({
            "type": "player",
            "url": url,
            "state": "ready",
        }));
    }

    record_started(paths, config, id, media_type, season, episode).await?;
    host.teardown();
    Ok(())
}

/// Put the title on the continue-watching shelf so it can be resumed later.
/// An existing entry keeps its progress; a new one starts at zero.
async fn record_started(
    paths: &PathManager,
    config: &Config,
    id: u64,
    media_type: MediaType,
    season: Option<u32>,
    episode: Option<u32>,
) -> Result<()> {
    let mut ctx = super::open_context(paths).await;

    let entry = match ctx.continue_watching.get(id, media_type) {
        Some(existing) => {
            let mut entry = existing.clone();
            entry.season = season.or(entry.season);
            entry.episode = episode.or(entry.episode);
            entry
        }
        None => {
            // Best effort: without a catalog title there is nothing useful
            // to put on the shelf.
            let Ok(details) = super::lookup_details(config, id, media_type).await else {
                return Ok(());
            };
            ContinueWatchingItem::new(
                id,
                media_type,
                details.item.display_title(),
                details.item.backdrop_path.clone(),
                0,
                season,
                episode,
            )
        }
    };

    ctx.continue_watching.upsert(entry);
    ctx.continue_watching.flush().await;
    Ok(())
}
