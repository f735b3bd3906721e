//! Domain types shared across the Gridwatch engine

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single fetched cell, as loosely typed as the source API returns it.
///
/// `Absent` covers both an explicit null and a cell elided past the end of a
/// ragged row. It carries no text: an absent cell in a tracked column fails
/// the whole poll cycle instead of masquerading as an empty string, which
/// would be indistinguishable from a cell the user cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Absent,
}

impl CellValue {
    /// Total coercion to text. `None` only for `Absent`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Str(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            // TRUE/FALSE is how the Sheets grid displays booleans.
            CellValue::Bool(true) => Some("TRUE".to_string()),
            CellValue::Bool(false) => Some("FALSE".to_string()),
            CellValue::Absent => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Str(s.to_string())
    }
}

/// Integral values render without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// The fixed, configured column indices the engine cares about.
///
/// Order is significant: it defines the width and layout of every projected
/// row. Invariant: non-empty, enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedColumns(Vec<usize>);

#[allow(clippy::len_without_is_empty)] // invariant: never empty
impl TrackedColumns {
    pub fn new(columns: Vec<usize>) -> Result<Self> {
        if columns.is_empty() {
            return Err(CoreError::Config(
                "At least one tracked column must be configured".to_string(),
            ));
        }
        Ok(Self(columns))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Position of `column` within the tracked order, if tracked at all.
    pub fn position(&self, column: usize) -> Option<usize> {
        self.0.iter().position(|&c| c == column)
    }
}

/// Per-cycle extraction of the tracked columns from all fetched rows.
///
/// Keyed by 0-based row index; each value vector is exactly
/// `TrackedColumns::len()` long. Equality is structural, and the ordered map
/// gives the renderer its ascending-row-index iteration for free.
pub type Projection = BTreeMap<usize, Vec<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_coercion() {
        assert_eq!(CellValue::from("Lead").to_text().as_deref(), Some("Lead"));
        assert_eq!(CellValue::Number(42.0).to_text().as_deref(), Some("42"));
        assert_eq!(CellValue::Number(2.5).to_text().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Bool(true).to_text().as_deref(), Some("TRUE"));
        assert_eq!(CellValue::Bool(false).to_text().as_deref(), Some("FALSE"));
        assert_eq!(CellValue::Absent.to_text(), None);
    }

    #[test]
    fn test_negative_integral_number() {
        assert_eq!(CellValue::Number(-7.0).to_text().as_deref(), Some("-7"));
    }

    #[test]
    fn test_tracked_columns_rejects_empty() {
        assert!(TrackedColumns::new(vec![]).is_err());
    }

    #[test]
    fn test_tracked_columns_position() {
        let cols = TrackedColumns::new(vec![0, 2, 5]).unwrap();
        assert_eq!(cols.position(2), Some(1));
        assert_eq!(cols.position(5), Some(2));
        assert_eq!(cols.position(1), None);
    }
}
