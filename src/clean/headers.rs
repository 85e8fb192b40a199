//! Promote a data row to column headers

use crate::config::CaseStyle;
use crate::error::{Result, TableError};
use crate::model::{Cell, Table};

use super::names::normalize_names;

/// Use row `row` (0-based) as the header, normalized in `style`.
///
/// The promoted row is removed. Rows above it, typically titles or notes a
/// spreadsheet carried above the real header, are removed too when
/// `remove_rows_above` is set.
pub fn row_to_names(
    table: &Table,
    row: usize,
    style: CaseStyle,
    remove_rows_above: bool,
) -> Result<Table> {
    if row >= table.row_count() {
        return Err(TableError::Empty("header row is past the end of the table"));
    }

    let raw: Vec<String> = table
        .row(row)
        .into_iter()
        .map(|cell| match cell {
            Cell::Null => String::new(),
            other => other.display().into_owned(),
        })
        .collect();
    let names = normalize_names(&raw, style);

    let keep: Vec<usize> = (0..table.row_count())
        .filter(|&r| r > row || (r < row && !remove_rows_above))
        .collect();

    table.select_rows(&keep).with_names(names)
}
