use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use reqwest::blocking::Client;
use scraper::{Html, Selector};

use crate::fetch::fetch_season_page;

/// Seasons are numbered from 0 on the archive.
pub const DEFAULT_SEASON_COUNT: u32 = 40;

/// Extract episode ids from one season listing page.
///
/// Only links whose visible text marks an aired game count; the archive lists
/// newest games first, so the per-season list is reversed to read
/// chronologically.
pub fn season_game_ids(html: &str) -> Result<Vec<u64>> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a").unwrap();

    let mut ids = Vec::new();
    for link in document.select(&link_selector) {
        let text: String = link.text().collect();
        if !text.contains("aired") {
            continue;
        }
        let href = link.value().attr("href").context("aired link has no href")?;
        let id = href
            .split("game_id=")
            .nth(1)
            .with_context(|| format!("no game id in link: {}", href))?
            .parse()
            .with_context(|| format!("bad game id in link: {}", href))?;
        ids.push(id);
    }
    ids.reverse();
    Ok(ids)
}

/// Walk every season listing and persist the flat id list as the canonical
/// scrape order, earliest aired first. A one-time precompute; re-run only to
/// refresh the ordering.
pub fn order_ids(client: &Client, seasons: u32, path: &Path) -> Result<Vec<u64>> {
    let progress = ProgressBar::new(u64::from(seasons));

    let mut ids = Vec::new();
    for season in 0..seasons {
        let html = fetch_season_page(client, season)?;
        ids.extend(season_game_ids(&html)?);
        progress.inc(1);
    }
    progress.finish();

    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer(file, &ids).context("failed to write id order")?;
    log::info!("persisted {} episode ids to {}", ids.len(), path.display());

    Ok(ids)
}

pub fn load_id_order(path: &Path) -> Result<Vec<u64>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open id order {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("malformed id order file {}", path.display()))
}
