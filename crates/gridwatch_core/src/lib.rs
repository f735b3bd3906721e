//! Gridwatch Core - Poll, Diff & Render Engine
//!
//! Gridwatch mirrors a tracked slice of a remote spreadsheet into a rendered
//! text file. This crate holds the engine: everything between "a range of
//! cells arrived" and "the output file reflects it". Fetching the cells is the
//! data source's job (see the `RangeFetch` seam).
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌───────────┐     ┌──────────┐     ┌────────────┐
//! │ RangeFetch │     │ Projector │     │  Differ  │     │ Renderer + │
//! │ (per poll) │────▶│ (tracked  │────▶│ (against │────▶│ Publisher  │
//! │            │     │  columns) │     │ baseline)│     │ (on change)│
//! └────────────┘     └───────────┘     └──────────┘     └────────────┘
//! ```
//!
//! # Core Concepts
//!
//! - **Projection**: per-cycle extraction of only the tracked columns from
//!   all fetched rows, keyed by row index
//! - **Baseline**: the last projection that was successfully rendered and
//!   published; the comparison point for change detection
//! - **Poll cycle**: one fetch → project → diff → (render/publish) → sleep
//!   iteration, driven by [`PollScheduler`]
//!
//! Every failure inside a cycle is fatal for the run: the loop is designed to
//! crash and be restarted by an external supervisor, not to self-heal.

pub mod config;
pub mod differ;
pub mod error;
pub mod projector;
pub mod publisher;
pub mod renderer;
pub mod scheduler;
pub mod types;

// Re-exports for convenience
pub use config::{FileConfig, SheetConfig, WatchConfig, MIN_REFRESH_INTERVAL_SECS};
pub use differ::Baseline;
pub use error::{CoreError, Result};
pub use projector::project;
pub use publisher::publish;
pub use renderer::{render, LineTemplate};
pub use scheduler::{CycleOutcome, PollScheduler, RangeFetch};
pub use types::{CellValue, Projection, TrackedColumns};
