use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use tracing::info;
use watch_state_models::{ContinueWatchingItem, MediaType, SavedItem};
use watchroom_config::{Config, PathManager};

use crate::output::{Output, OutputFormat};

pub async fn run_list(paths: &PathManager, output: &Output) -> Result<()> {
    let ctx = super::open_context(paths).await;
    let items = ctx.watchlist.items();

    if output.format() != OutputFormat::Human {
        output.json(&serde_json::to_value(items)?);
        return Ok(());
    }
    if items.is_empty() {
        output.info("Your watchlist is empty.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Type", "Title"]);
    for item in items {
        table.add_row(vec![
            item.id.to_string(),
            item.media_type.to_string(),
            item.title.clone(),
        ]);
    }
    output.info(table.to_string());
    Ok(())
}

pub async fn run_add(
    paths: &PathManager,
    config: &Config,
    output: &Output,
    id: u64,
    media_type: MediaType,
    title: Option<String>,
) -> Result<()> {
    let item = match title {
        Some(title) => SavedItem {
            id,
            media_type,
            title,
            poster_path: None,
            backdrop_path: None,
        },
        None => {
            let details = super::lookup_details(config, id, media_type).await?;
            details.item.to_saved_item(media_type)
        }
    };

    let mut ctx = super::open_context(paths).await;
    let title = item.title.clone();
    if ctx.watchlist.add(item) {
        info!(id, %media_type, "Added to watchlist");
        ctx.watchlist.flush().await;
        if ctx.watchlist.is_degraded() {
            output.warn("Saved in this session only; the watchlist file could not be written");
        }
        output.success(format!("Added \"{}\" to your watchlist", title));
    } else {
        output.info(format!("\"{}\" is already on your watchlist", title));
    }
    Ok(())
}

pub async fn run_remove(
    paths: &PathManager,
    output: &Output,
    id: u64,
    media_type: MediaType,
) -> Result<()> {
    let mut ctx = super::open_context(paths).await;
    if ctx.watchlist.remove(id, media_type) {
        info!(id, %media_type, "Removed from watchlist");
        ctx.watchlist.flush().await;
        output.success(format!("Removed {} {} from your watchlist", media_type, id));
    } else {
        output.warn(format!("{} {} is not on your watchlist", media_type, id));
    }
    Ok(())
}

pub async fn run_watching(paths: &PathManager, output: &Output) -> Result<()> {
    let ctx = super::open_context(paths).await;
    let items = ctx.continue_watching.items();

    if output.format() != OutputFormat::Human {
        output.json(&serde_json::to_value(items)?);
        return Ok(());
    }
    if items.is_empty() {
        output.info("Nothing in progress.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Type", "Title", "Progress", "Where"]);
    for item in items {
        table.add_row(vec![
            item.id.to_string(),
            item.media_type.to_string(),
            item.title.clone(),
            format!("{}%", item.progress),
            position(item),
        ]);
    }
    output.info(table.to_string());
    Ok(())
}

fn position(item: &ContinueWatchingItem) -> String {
    match (item.season, item.episode) {
        (Some(s), Some(e)) => format!("S{:02}E{:02}", s, e),
        (Some(s), None) => format!("S{:02}", s),
        _ => String::new(),
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn run_resume(
    paths: &PathManager,
    config: &Config,
    output: &Output,
    id: u64,
    media_type: MediaType,
    progress: u8,
    title: Option<String>,
    season: Option<u32>,
    episode: Option<u32>,
) -> Result<()> {
    let mut ctx = super::open_context(paths).await;

    // Resolve title and artwork: explicit flag, then the existing shelf
    // entry, then a catalog lookup.
    let (title, backdrop_path) = match title {
        Some(title) => (title, None),
        None => match ctx.continue_watching.get(id, media_type) {
            Some(existing) => (existing.title.clone(), existing.backdrop_path.clone()),
            None => {
                let details = super::lookup_details(config, id, media_type).await?;
                (
                    details.item.display_title().to_string(),
                    details.item.backdrop_path.clone(),
                )
            }
        },
    };

    let item = ContinueWatchingItem::new(
        id,
        media_type,
        title,
        backdrop_path,
        progress,
        season,
        episode,
    );
    let recorded = item.progress;
    let title = item.title.clone();
    info!(id, %media_type, progress = recorded, "Progress recorded");
    ctx.continue_watching.upsert(item);
    ctx.continue_watching.flush().await;
    if ctx.continue_watching.is_degraded() {
        output.warn("Recorded in this session only; the progress file could not be written");
    }
    output.success(format!("\"{}\" at {}%", title, recorded));
    Ok(())
}
