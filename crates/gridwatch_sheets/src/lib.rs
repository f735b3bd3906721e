//! Google Sheets data source for Gridwatch
//!
//! Raw HTTP access to the Sheets v4 `values.get` endpoint plus the OAuth2
//! installed-app flow that authenticates it (no heavy SDK dependencies).
//! The client implements [`gridwatch_core::RangeFetch`], so the poll engine
//! never sees HTTP.

pub mod auth;
pub mod client;
pub mod error;

pub use auth::{Authenticator, CachedToken, InstalledCredentials};
pub use client::{SheetsClient, ValueRange};
pub use error::{Result, SheetsError};
