//! Poll scheduler
//!
//! Drives the loop: fetch → project → diff → (render → publish) → sleep.
//! One cycle is active at a time; the baseline projection is owned by the
//! scheduler instance and replaced only after a successful publish.

use crate::config::WatchConfig;
use crate::differ::Baseline;
use crate::error::{CoreError, Result};
use crate::projector::project;
use crate::publisher::publish;
use crate::renderer::{render, LineTemplate};
use crate::types::{CellValue, TrackedColumns};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Seam to the data source: one fetch of the configured range per poll cycle.
///
/// Implemented by the Sheets client and by in-memory fakes in tests. A fetch
/// failure is fatal for the run; the scheduler does not retry.
pub trait RangeFetch {
    fn fetch_range(
        &mut self,
    ) -> impl std::future::Future<Output = anyhow::Result<Vec<Vec<CellValue>>>> + Send;
}

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A change was detected; the artifact was rewritten with this many rows.
    Published { rows: usize },
    /// The tracked projection matched the baseline; nothing was written.
    Unchanged,
}

/// The poll loop state machine.
pub struct PollScheduler<F> {
    fetcher: F,
    columns: TrackedColumns,
    template: LineTemplate,
    output_path: PathBuf,
    interval: Duration,
    baseline: Baseline,
}

impl<F: RangeFetch> PollScheduler<F> {
    pub fn new(config: &WatchConfig, fetcher: F) -> Result<Self> {
        Ok(Self {
            fetcher,
            columns: config.tracked_columns()?,
            template: LineTemplate::new(&config.file.format),
            output_path: config.file.location.clone(),
            interval: config.refresh_interval(),
            baseline: Baseline::new(),
        })
    }

    /// Run one full poll cycle.
    ///
    /// The baseline is committed only after `publish` succeeds; on any error
    /// it is left untouched so a restarted process re-detects the change.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        debug!("Fetching tracked range");
        let rows = self
            .fetcher
            .fetch_range()
            .await
            .map_err(|source| CoreError::Fetch { source })?;

        let current = project(&rows, &self.columns)?;

        if !self.baseline.has_changed(&current) {
            info!("Spreadsheet has not updated");
            return Ok(CycleOutcome::Unchanged);
        }

        let row_count = current.len();
        info!(rows = row_count, "Change in the spreadsheet, updating the file");
        let lines = render(&current, &self.template, &self.columns);
        publish(&lines, &self.output_path)?;
        self.baseline.accept(current);

        Ok(CycleOutcome::Published { rows: row_count })
    }

    /// Run cycles forever, sleeping the configured interval between them.
    /// Returns only on a fatal error.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.run_cycle().await?;
            debug!(secs = self.interval.as_secs(), "Sleeping until next poll");
            tokio::time::sleep(self.interval).await;
        }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }
}
