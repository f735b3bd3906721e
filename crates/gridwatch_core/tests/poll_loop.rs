//! Integration tests for the poll-diff-render loop
//!
//! Drives the scheduler cycle by cycle with a scripted in-memory fetcher and
//! asserts on the published artifact and baseline handling.

use gridwatch_core::{
    CellValue, CoreError, CycleOutcome, FileConfig, PollScheduler, RangeFetch, SheetConfig,
    WatchConfig,
};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

/// Fetcher that replays a scripted sequence of ranges, one per cycle.
struct ScriptedFetcher {
    responses: VecDeque<anyhow::Result<Vec<Vec<CellValue>>>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<anyhow::Result<Vec<Vec<CellValue>>>>) -> Self {
        Self {
            responses: responses.into(),
        }
    }
}

impl RangeFetch for ScriptedFetcher {
    async fn fetch_range(&mut self) -> anyhow::Result<Vec<Vec<CellValue>>> {
        self.responses
            .pop_front()
            .unwrap_or_else(|| panic!("fetcher script exhausted"))
    }
}

fn rows(data: &[&[&str]]) -> Vec<Vec<CellValue>> {
    data.iter()
        .map(|row| row.iter().map(|&cell| CellValue::from(cell)).collect())
        .collect()
}

fn config(output: &Path) -> WatchConfig {
    WatchConfig {
        sheet: SheetConfig {
            id: "sheet-1".to_string(),
            table: "Roster".to_string(),
            cells_start: "A1".to_string(),
            cell_end: "C10".to_string(),
            columns: vec![0, 2],
            refresh_interval: 60,
        },
        file: FileConfig {
            location: output.to_path_buf(),
            format: "&0& - &2&\n".to_string(),
        },
    }
}

#[tokio::test]
async fn test_first_cycle_publishes() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let fetcher = ScriptedFetcher::new(vec![Ok(rows(&[
        &["Alice", "ignored", "Lead"],
        &["Bob", "x", "Eng"],
    ]))]);
    let mut scheduler = PollScheduler::new(&config(&output), fetcher).unwrap();

    let outcome = scheduler.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Published { rows: 2 });
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Alice - Lead\nBob - Eng\n"
    );
}

#[tokio::test]
async fn test_identical_fetch_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let sheet = rows(&[&["Alice", "ignored", "Lead"], &["Bob", "x", "Eng"]]);
    let fetcher = ScriptedFetcher::new(vec![Ok(sheet.clone()), Ok(sheet)]);
    let mut scheduler = PollScheduler::new(&config(&output), fetcher).unwrap();

    scheduler.run_cycle().await.unwrap();
    let modified_after_first = fs::metadata(&output).unwrap().modified().unwrap();

    let outcome = scheduler.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Unchanged);
    assert_eq!(
        fs::metadata(&output).unwrap().modified().unwrap(),
        modified_after_first
    );
    assert_eq!(scheduler.baseline().rows().len(), 2);
}

#[tokio::test]
async fn test_changed_cell_rewrites_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let fetcher = ScriptedFetcher::new(vec![
        Ok(rows(&[&["Alice", "i", "Lead"], &["Bob", "x", "Eng"]])),
        Ok(rows(&[&["Alice", "i", "Lead"], &["Bob", "x", "Ops"]])),
    ]);
    let mut scheduler = PollScheduler::new(&config(&output), fetcher).unwrap();

    scheduler.run_cycle().await.unwrap();
    let outcome = scheduler.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Published { rows: 2 });
    // Row 0 is unchanged but still present: a full rewrite, not a patch.
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Alice - Lead\nBob - Ops\n"
    );
}

#[tokio::test]
async fn test_empty_first_fetch_publishes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![])]);
    let mut scheduler = PollScheduler::new(&config(&output), fetcher).unwrap();

    let outcome = scheduler.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Unchanged);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_fetch_error_is_fatal_for_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let fetcher = ScriptedFetcher::new(vec![Err(anyhow::anyhow!("quota exceeded"))]);
    let mut scheduler = PollScheduler::new(&config(&output), fetcher).unwrap();

    let err = scheduler.run_cycle().await.unwrap_err();
    assert!(matches!(err, CoreError::Fetch { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_short_row_aborts_without_publishing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.txt");
    let fetcher = ScriptedFetcher::new(vec![Ok(rows(&[&["Alice", "i", "Lead"], &["Bob"]]))]);
    let mut scheduler = PollScheduler::new(&config(&output), fetcher).unwrap();

    let err = scheduler.run_cycle().await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::MissingCell { row: 1, column: 2 }
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_publish_failure_keeps_old_baseline() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directory never created: every publish fails.
    let output = dir.path().join("missing").join("out.txt");
    let sheet = rows(&[&["Alice", "i", "Lead"]]);
    let fetcher = ScriptedFetcher::new(vec![Ok(sheet)]);
    let mut scheduler = PollScheduler::new(&config(&output), fetcher).unwrap();

    let err = scheduler.run_cycle().await.unwrap_err();
    assert!(matches!(err, CoreError::Publish { .. }));
    // The change was not committed: a restarted process would re-detect it.
    assert!(scheduler.baseline().rows().is_empty());
}
