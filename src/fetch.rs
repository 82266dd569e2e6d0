use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::extract::{extract_episode, Episode};

const EPISODE_URL: &str = "https://j-archive.com/showgame.php";
const SEASON_URL: &str = "https://j-archive.com/showseason.php";

/// Episode pages occasionally hang mid-transfer; season listings are few
/// enough to leave on the client default.
const EPISODE_TIMEOUT: Duration = Duration::from_secs(10);

pub fn fetch_episode_page(client: &Client, game_id: u64) -> Result<String> {
    let url = format!("{}?game_id={}", EPISODE_URL, game_id);
    let response = client
        .get(&url)
        .timeout(EPISODE_TIMEOUT)
        .send()
        .with_context(|| format!("request failed: {}", url))?;
    response
        .text()
        .with_context(|| format!("failed to read response body: {}", url))
}

pub fn fetch_season_page(client: &Client, season: u32) -> Result<String> {
    let url = format!("{}?season={}", SEASON_URL, season);
    let response = client
        .get(&url)
        .send()
        .with_context(|| format!("request failed: {}", url))?;
    response
        .text()
        .with_context(|| format!("failed to read response body: {}", url))
}

/// Fetch and extract one episode as a single unit; a failure anywhere leaves
/// nothing behind for the episode.
pub fn scrape_episode(client: &Client, game_id: u64) -> Result<Episode> {
    let html = fetch_episode_page(client, game_id)?;
    extract_episode(&html, game_id)
}
