//! Sheets v4 values client
//!
//! One endpoint is all the engine needs: `values.get` over a configured A1
//! range. Raw reqwest against the REST surface, bearer-authenticated by the
//! [`Authenticator`].

use crate::auth::Authenticator;
use crate::error::{Result, SheetsError};
use gridwatch_core::{CellValue, RangeFetch};
use serde::Deserialize;
use tracing::debug;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// `values.get` response payload.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default, rename = "majorDimension")]
    pub major_dimension: Option<String>,
    /// Loosely typed cells; rows may be ragged (trailing empties elided).
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    /// Convert the JSON cells into the engine's cell model.
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_from_json).collect())
            .collect()
    }
}

fn cell_from_json(value: serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::String(s) => CellValue::Str(s),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f),
            None => CellValue::Str(n.to_string()),
        },
        serde_json::Value::Bool(b) => CellValue::Bool(b),
        serde_json::Value::Null => CellValue::Absent,
        // Arrays/objects never appear in a values payload; keep the raw JSON
        // text rather than guessing.
        other => CellValue::Str(other.to_string()),
    }
}

/// Sheets API error payload.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

/// Authenticated client polling one spreadsheet range.
pub struct SheetsClient {
    auth: Authenticator,
    http_client: reqwest::Client,
    spreadsheet_id: String,
    range: String,
}

impl SheetsClient {
    /// `range` is A1 notation, e.g. `Roster!A2:C50`.
    pub fn new(auth: Authenticator, spreadsheet_id: String, range: String) -> Self {
        Self {
            auth,
            http_client: reqwest::Client::new(),
            spreadsheet_id,
            range,
        }
    }

    /// Fetch the configured range. Transport failures and non-success API
    /// statuses both surface as errors; there is no retry at this layer.
    pub async fn values_get(&mut self) -> Result<ValueRange> {
        let token = self.auth.access_token().await?;
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{}",
            self.spreadsheet_id, self.range
        );
        debug!(%url, "Requesting sheet values");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => status.to_string(),
            };
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value_range: ValueRange = response.json().await?;
        Ok(value_range)
    }
}

impl RangeFetch for SheetsClient {
    async fn fetch_range(&mut self) -> anyhow::Result<Vec<Vec<CellValue>>> {
        let value_range = self.values_get().await?;
        Ok(value_range.into_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_converts_cell_types() {
        let json = r#"{
            "range": "Roster!A1:C2",
            "majorDimension": "ROWS",
            "values": [
                ["Alice", 42, true],
                ["Bob", 2.5, null]
            ]
        }"#;
        let value_range: ValueRange = serde_json::from_str(json).unwrap();
        let rows = value_range.into_rows();
        assert_eq!(
            rows[0],
            vec![
                CellValue::Str("Alice".to_string()),
                CellValue::Number(42.0),
                CellValue::Bool(true),
            ]
        );
        assert_eq!(rows[1][2], CellValue::Absent);
    }

    #[test]
    fn test_empty_values_field_defaults() {
        let value_range: ValueRange = serde_json::from_str(r#"{"range": "A1:C1"}"#).unwrap();
        assert!(value_range.into_rows().is_empty());
    }

    #[test]
    fn test_ragged_rows_preserved() {
        let json = r#"{"values": [["a", "b", "c"], ["d"]]}"#;
        let value_range: ValueRange = serde_json::from_str(json).unwrap();
        let rows = value_range.into_rows();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn test_api_error_body_parse() {
        let json = r#"{"error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.code, Some(403));
        assert!(body.error.message.contains("permission"));
    }
}
