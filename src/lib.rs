pub mod dataset;
pub mod extract;
pub mod fetch;
pub mod ids;
pub mod run;

// Re-export tests for integration testing
#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::extract::{extract_clues, extract_episode, Clue, Episode, Round};
pub use crate::fetch::{fetch_episode_page, fetch_season_page, scrape_episode};
pub use crate::ids::{load_id_order, order_ids, season_game_ids};
pub use crate::run::{run, RunOutcome, ScrapeConfig};
