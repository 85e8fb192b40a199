//! First-non-null merging of several columns

use crate::error::{Result, TableError};
use crate::model::{Cell, Column, Table};

/// Merge columns elementwise: cell `i` is the first non-Null cell among the
/// inputs at position `i`, in the given order, or Null.
pub fn coalesce(columns: &[&Column], name: impl Into<String>) -> Result<Column> {
    let first = columns.first().ok_or(TableError::Empty("no columns to coalesce"))?;

    if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
        return Err(TableError::DimensionMismatch(format!(
            "column '{}' has {} rows, column '{}' has {}",
            bad.name,
            bad.len(),
            first.name,
            first.len()
        )));
    }

    let cells = (0..first.len())
        .map(|row| {
            columns
                .iter()
                .map(|c| &c.cells[row])
                .find(|cell| !cell.is_null())
                .cloned()
                .unwrap_or(Cell::Null)
        })
        .collect();

    Ok(Column::new(name, cells))
}

/// Coalesce named columns of a table into `into`, replacing a column of
/// that name or appending a new one.
pub fn coalesce_columns(table: &Table, sources: &[&str], into: &str) -> Result<Table> {
    let columns = sources
        .iter()
        .map(|name| {
            table
                .column(name)
                .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let merged = coalesce(&columns, into)?;
    tracing::debug!(
        into,
        sources = sources.len(),
        nulls = merged.cells.iter().filter(|c| c.is_null()).count(),
        "coalesced columns"
    );
    table.with_column(merged)
}
