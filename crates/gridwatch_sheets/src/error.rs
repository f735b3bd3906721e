//! Error types for the Sheets data source

use std::io;
use thiserror::Error;

/// Sheets data source error type
#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
