//! Row projector
//!
//! Extracts only the tracked columns from a fetched range, producing the
//! projection the differ and renderer operate on.

use crate::error::{CoreError, Result};
use crate::types::{CellValue, Projection, TrackedColumns};

/// Project a fetched range onto the tracked columns.
///
/// A tracked column that is missing from some row (the row is shorter than
/// the column index, or the cell is absent) fails the entire cycle. The
/// source elides trailing empty cells, so "column absent" cannot be told
/// apart from "column cleared" — substituting an empty string here would
/// corrupt the change-detection signal.
pub fn project(rows: &[Vec<CellValue>], columns: &TrackedColumns) -> Result<Projection> {
    let mut projection = Projection::new();
    for (row_index, row) in rows.iter().enumerate() {
        let mut values = Vec::with_capacity(columns.len());
        for &column in columns.indices() {
            let text = row
                .get(column)
                .and_then(CellValue::to_text)
                .ok_or(CoreError::MissingCell {
                    row: row_index,
                    column,
                })?;
            values.push(text);
        }
        projection.insert(row_index, values);
    }
    Ok(projection)
}
