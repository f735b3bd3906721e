//! Error types for the Gridwatch engine

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Row {row} has no value in tracked column {column}")]
    MissingCell { row: usize, column: usize },

    #[error("Failed to fetch sheet range: {source}")]
    Fetch {
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to publish {path}: {source}")]
    Publish {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;
