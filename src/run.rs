use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use reqwest::blocking::Client;

use crate::dataset::{append_episode, completed_ids};
use crate::extract::Episode;
use crate::fetch::scrape_episode;
use crate::ids::load_id_order;

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub output: PathBuf,
    pub id_order: PathBuf,
    pub error_log: PathBuf,
    /// Pause after every episode attempt, successful or not.
    pub crawl_delay: Duration,
    /// Skip episodes already present in the output dataset.
    pub resume: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The output file already exists and resume was not requested. Nothing
    /// was fetched or written.
    AbortedOutputExists,
    Completed { succeeded: usize, failed: usize },
}

/// Scrape every episode in the canonical order, one at a time.
pub fn run(config: &ScrapeConfig) -> Result<RunOutcome> {
    let client = Client::new();
    run_with(config, |game_id| scrape_episode(&client, game_id))
}

/// Batch loop with the per-episode scrape injected, so the runner can be
/// exercised without a network.
pub(crate) fn run_with(
    config: &ScrapeConfig,
    mut scrape: impl FnMut(u64) -> Result<Episode>,
) -> Result<RunOutcome> {
    if config.output.exists() && !config.resume {
        return Ok(RunOutcome::AbortedOutputExists);
    }

    let mut ids = load_id_order(&config.id_order)?;
    // The canonical file is earliest-first; the established crawl order works
    // backward from the newest episode.
    ids.reverse();

    let done: HashSet<u64> = if config.resume {
        completed_ids(&config.output)?
    } else {
        HashSet::new()
    };

    // The error log does not survive across runs.
    let mut error_log = File::create(&config.error_log)
        .with_context(|| format!("failed to create {}", config.error_log.display()))?;

    let progress = ProgressBar::new(ids.len() as u64);
    let mut succeeded = 0;
    let mut failed = 0;

    for game_id in ids {
        progress.inc(1);
        if done.contains(&game_id) {
            continue;
        }

        match scrape(game_id) {
            Ok(episode) => {
                append_episode(&config.output, &episode)?;
                succeeded += 1;
            }
            Err(err) => {
                log::warn!("episode {} failed: {:#}", game_id, err);
                write!(error_log, "{}{:#}\n\n", game_id, err)
                    .with_context(|| format!("failed to write {}", config.error_log.display()))?;
                failed += 1;
            }
        }

        if !config.crawl_delay.is_zero() {
            thread::sleep(config.crawl_delay);
        }
    }
    progress.finish();

    Ok(RunOutcome::Completed { succeeded, failed })
}
