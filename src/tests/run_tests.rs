use std::collections::HashSet;
use std::fs;
use std::time::Duration;

use anyhow::anyhow;
use chrono::NaiveDate;
use tempfile::TempDir;

use crate::dataset::{append_episode, completed_ids, FINAL_ROUND_VALUE};
use crate::extract::{Clue, Episode, Round};
use crate::run::{run_with, RunOutcome, ScrapeConfig};

fn test_episode(game_id: u64) -> Episode {
    Episode {
        game_id,
        air_date: NaiveDate::from_ymd_opt(2004, 9, 8).unwrap(),
        clues: vec![Clue {
            text: format!("Clue for {}", game_id),
            answer: "the Magna Carta".to_string(),
            category: "HISTORY".to_string(),
            round: Round::Single,
            value: Some(200),
        }],
    }
}

fn test_config(dir: &TempDir, resume: bool) -> ScrapeConfig {
    ScrapeConfig {
        output: dir.path().join("data.csv"),
        id_order: dir.path().join("id_order.json"),
        error_log: dir.path().join("errors.txt"),
        crawl_delay: Duration::ZERO,
        resume,
    }
}

fn write_id_order(config: &ScrapeConfig, ids: &[u64]) {
    fs::write(&config.id_order, serde_json::to_string(&ids).unwrap()).unwrap();
}

#[test]
fn test_existing_output_without_resume_aborts_before_scraping() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, false);
    write_id_order(&config, &[1, 2]);
    fs::write(&config.output, "clue,answer,category,value,date,game_id\n").unwrap();

    let mut calls = 0;
    let outcome = run_with(&config, |id| {
        calls += 1;
        Ok(test_episode(id))
    })
    .unwrap();

    assert_eq!(outcome, RunOutcome::AbortedOutputExists);
    assert_eq!(calls, 0, "aborted run must not scrape anything");
}

#[test]
fn test_run_processes_ids_newest_first() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, true);
    write_id_order(&config, &[10, 11, 12]);

    let mut scraped = Vec::new();
    run_with(&config, |id| {
        scraped.push(id);
        Ok(test_episode(id))
    })
    .unwrap();

    assert_eq!(scraped, vec![12, 11, 10]);
}

#[test]
fn test_resume_skips_completed_episodes_and_writes_no_duplicates() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, true);
    write_id_order(&config, &[1, 2, 3]);

    // First run gets through episodes 3 and 2, then fails on 1.
    let outcome = run_with(&config, |id| {
        if id == 1 {
            Err(anyhow!("connection reset"))
        } else {
            Ok(test_episode(id))
        }
    })
    .unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Completed {
            succeeded: 2,
            failed: 1
        }
    );

    // The resumed run must only scrape the episode that is missing.
    let mut scraped = Vec::new();
    let outcome = run_with(&config, |id| {
        scraped.push(id);
        Ok(test_episode(id))
    })
    .unwrap();

    assert_eq!(scraped, vec![1]);
    assert_eq!(
        outcome,
        RunOutcome::Completed {
            succeeded: 1,
            failed: 0
        }
    );

    let done = completed_ids(&config.output).unwrap();
    assert_eq!(done, HashSet::from([1, 2, 3]));

    // Header once, one row per episode, nothing written twice.
    let contents = fs::read_to_string(&config.output).unwrap();
    assert_eq!(contents.lines().count(), 4);
    assert_eq!(
        contents
            .lines()
            .filter(|line| line.starts_with("clue,answer"))
            .count(),
        1
    );
}

#[test]
fn test_failed_episode_is_logged_and_run_continues() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, true);
    write_id_order(&config, &[5, 6]);

    let outcome = run_with(&config, |id| {
        if id == 6 {
            Err(anyhow!("no correct response for clue_J_0_1"))
        } else {
            Ok(test_episode(id))
        }
    })
    .unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Completed {
            succeeded: 1,
            failed: 1
        }
    );

    // The failed id never reaches the dataset
    let done = completed_ids(&config.output).unwrap();
    assert_eq!(done, HashSet::from([5]));

    // Error log pairs the id with the failure, entries separated by a blank
    // line
    let log = fs::read_to_string(&config.error_log).unwrap();
    assert!(log.starts_with("6no correct response"));
    assert!(log.ends_with("\n\n"));
}

#[test]
fn test_error_log_is_truncated_at_run_start() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, true);
    write_id_order(&config, &[7]);
    fs::write(&config.error_log, "leftover from a previous run\n\n").unwrap();

    run_with(&config, |id| Ok(test_episode(id))).unwrap();

    let log = fs::read_to_string(&config.error_log).unwrap();
    assert!(log.is_empty());
}

#[test]
fn test_append_writes_header_only_on_creation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.csv");

    append_episode(&path, &test_episode(1)).unwrap();
    append_episode(&path, &test_episode(2)).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("clue,answer,category,value,date,game_id")
    );
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn test_final_round_value_rendered_as_sentinel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.csv");

    let mut episode = test_episode(3);
    episode.clues = vec![Clue {
        text: "He was the only U.S. president to serve two non-consecutive terms".to_string(),
        answer: "Grover Cleveland".to_string(),
        category: "FAMOUS AMERICANS".to_string(),
        round: Round::Final,
        value: None,
    }];
    append_episode(&path, &episode).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains(FINAL_ROUND_VALUE));
}

#[test]
fn test_completed_ids_of_missing_dataset_is_empty() {
    let dir = TempDir::new().unwrap();
    let done = completed_ids(&dir.path().join("data.csv")).unwrap();
    assert!(done.is_empty());
}
