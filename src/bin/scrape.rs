use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use jarchive_scraper::{run, RunOutcome, ScrapeConfig};

/// Scrape every episode in the canonical id order into a CSV dataset.
#[derive(Parser)]
struct Args {
    /// Output dataset
    #[arg(long, default_value = "jeopardy_data.csv")]
    output: PathBuf,

    /// Canonical episode id order, produced by the order_ids binary
    #[arg(long, default_value = "id_order.json")]
    id_order: PathBuf,

    /// Per-episode failure log, recreated on every run
    #[arg(long, default_value = "errors.txt")]
    error_log: PathBuf,

    /// Seconds to wait between episodes
    #[arg(long, default_value_t = 2)]
    crawl_delay: u64,

    /// Refuse to touch an existing dataset instead of resuming into it
    #[arg(long)]
    no_resume: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ScrapeConfig {
        output: args.output,
        id_order: args.id_order,
        error_log: args.error_log,
        crawl_delay: Duration::from_secs(args.crawl_delay),
        resume: !args.no_resume,
    };

    match run(&config)? {
        RunOutcome::AbortedOutputExists => {
            eprintln!(
                "{} already exists; move it aside or drop --no-resume",
                config.output.display()
            );
            std::process::exit(1);
        }
        RunOutcome::Completed { succeeded, failed } => {
            println!("Scraped {} episodes ({} failed)", succeeded, failed);
        }
    }

    Ok(())
}
