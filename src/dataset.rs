use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extract::Episode;

/// Rendered in the value column for the final-round clue.
pub const FINAL_ROUND_VALUE: &str = "FINAL JEOPARDY";

const DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Serialize, Deserialize)]
struct ClueRow {
    clue: String,
    answer: String,
    category: String,
    value: String,
    date: String,
    game_id: u64,
}

/// Append one row per clue, with the episode-level fields replicated onto
/// every row. The header is written only when the file is first created.
/// No dedup happens here; the caller must not re-submit a written episode.
pub fn append_episode(path: &Path, episode: &Episode) -> Result<()> {
    let write_header = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);

    let date = episode.air_date.format(DATE_FORMAT).to_string();
    for clue in &episode.clues {
        writer.serialize(ClueRow {
            clue: clue.text.clone(),
            answer: clue.answer.clone(),
            category: clue.category.clone(),
            value: clue
                .value
                .map_or_else(|| FINAL_ROUND_VALUE.to_string(), |v| v.to_string()),
            date: date.clone(),
            game_id: episode.game_id,
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush dataset {}", path.display()))
}

/// Episode ids already present in the dataset, for resume filtering. A
/// dataset that does not exist yet has no completed episodes.
pub fn completed_ids(path: &Path) -> Result<HashSet<u64>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    let mut done = HashSet::new();
    for row in reader.deserialize::<ClueRow>() {
        done.insert(row.context("malformed dataset row")?.game_id);
    }
    Ok(done)
}
