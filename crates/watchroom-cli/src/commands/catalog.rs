use catalog_api::{CatalogClient, CatalogItem, TimeWindow};
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use serde_json::json;
use watch_state_models::MediaType;
use watchroom_config::Config;

use crate::output::{Output, OutputFormat};

pub async fn run_search(config: &Config, output: &Output, query: &str) -> Result<()> {
    let client = CatalogClient::from_config(&config.catalog)?;
    let results = client.search(query).await?;
    render(output, &results, None);
    Ok(())
}

pub async fn run_trending(
    config: &Config,
    output: &Output,
    media_type: MediaType,
    day: bool,
) -> Result<()> {
    let client = CatalogClient::from_config(&config.catalog)?;
    let window = if day { TimeWindow::Day } else { TimeWindow::Week };
    let results = client.trending(media_type, window).await?;
    render(output, &results, Some(media_type));
    Ok(())
}

/// Print catalog results. `fallback_type` fills in the media type for
/// endpoints that do not echo it per item.
fn render(output: &Output, results: &[CatalogItem], fallback_type: Option<MediaType>) {
    let type_of = |item: &CatalogItem| item.media_type.or(fallback_type);

    if output.format() != OutputFormat::Human {
        let rows: Vec<_> = results
            .iter()
            .map(|item| {
                json!({
                    "id": item.id,
                    "type": type_of(item).map(|t| t.to_string()),
                    "title": item.display_title(),
                    "rating": item.vote_average,
                    "date": item.release_date.as_ref().or(item.first_air_date.as_ref()),
                })
            })
            .collect();
        output.json(&serde_json::Value::Array(rows));
        return;
    }
    if results.is_empty() {
        output.info("No results.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Type", "Title", "Rating"]);
    for item in results {
        table.add_row(vec![
            item.id.to_string(),
            type_of(item).map(|t| t.to_string()).unwrap_or_default(),
            item.display_title().to_string(),
            item.vote_average
                .map(|r| format!("{:.1}", r))
                .unwrap_or_default(),
        ]);
    }
    output.info(table.to_string());
}
