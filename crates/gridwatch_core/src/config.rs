//! Watch configuration
//!
//! Loaded once at startup from a JSON file and immutable afterwards:
//!
//! ```json
//! {
//!   "sheet": {
//!     "id": "1BxiMVs0...",
//!     "table": "Roster",
//!     "cells_start": "A2",
//!     "cell_end": "C50",
//!     "columns": [0, 2],
//!     "refresh_interval": 120
//!   },
//!   "file": {
//!     "location": "out/roster.txt",
//!     "format": "&0& - &2&\n"
//!   }
//! }
//! ```

use crate::error::{CoreError, Result};
use crate::types::TrackedColumns;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Floor for the refresh interval; anything lower hammers the API quota.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 60;

/// Top-level watch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub sheet: SheetConfig,
    pub file: FileConfig,
}

/// Which spreadsheet range to poll, and how often
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Spreadsheet identifier (the long token in the sheet URL)
    pub id: String,

    /// Sheet/tab name the range lives on
    #[serde(default)]
    pub table: String,

    /// Upper-left cell of the polled range, A1 notation
    pub cells_start: String,

    /// Lower-right cell of the polled range, A1 notation
    pub cell_end: String,

    /// 0-based indices of the columns to track, in render order
    pub columns: Vec<usize>,

    /// Poll interval in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

/// Where the rendered artifact goes and what each line looks like
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    /// Output file path, fully overwritten on every change
    pub location: PathBuf,

    /// Line template; `&N&` expands to tracked column N's value. Templates
    /// embed their own line terminators.
    pub format: String,
}

fn default_refresh_interval() -> u64 {
    MIN_REFRESH_INTERVAL_SECS
}

impl WatchConfig {
    /// Load and validate configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: WatchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        if config.sheet.refresh_interval < MIN_REFRESH_INTERVAL_SECS {
            warn!(
                configured = config.sheet.refresh_interval,
                floor = MIN_REFRESH_INTERVAL_SECS,
                "Refresh interval below floor, clamping"
            );
            config.sheet.refresh_interval = MIN_REFRESH_INTERVAL_SECS;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.sheet.id.is_empty() {
            return Err(CoreError::Config("No sheet id in the config".to_string()));
        }
        if self.sheet.cells_start.is_empty() || self.sheet.cell_end.is_empty() {
            return Err(CoreError::Config(
                "A starting and ending cell is required".to_string(),
            ));
        }
        if self.sheet.columns.is_empty() {
            return Err(CoreError::Config(
                "At least one column must be set for values".to_string(),
            ));
        }
        Ok(())
    }

    /// A1 range string for the values API, e.g. `Roster!A2:C50`.
    pub fn range(&self) -> String {
        if self.sheet.table.is_empty() {
            format!("{}:{}", self.sheet.cells_start, self.sheet.cell_end)
        } else {
            format!(
                "{}!{}:{}",
                self.sheet.table, self.sheet.cells_start, self.sheet.cell_end
            )
        }
    }

    pub fn tracked_columns(&self) -> Result<TrackedColumns> {
        TrackedColumns::new(self.sheet.columns.clone())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.sheet.refresh_interval)
    }
}
