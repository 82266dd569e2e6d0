use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use reqwest::blocking::Client;

use jarchive_scraper::ids;

/// Walk the season listings and persist the canonical episode id order.
#[derive(Parser)]
struct Args {
    /// Where to write the id order
    #[arg(long, default_value = "id_order.json")]
    output: PathBuf,

    /// Number of seasons to walk, starting from season 0
    #[arg(long, default_value_t = ids::DEFAULT_SEASON_COUNT)]
    seasons: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let client = Client::new();
    let ids = ids::order_ids(&client, args.seasons, &args.output)?;

    println!("Wrote {} episode ids to {}", ids.len(), args.output.display());
    Ok(())
}
