//! Duplicate-row detection over key columns

use rustc_hash::FxHashMap;

use crate::error::{Result, TableError};
use crate::model::{Cell, Column, Table};

/// Name of the group-size column appended by [`get_dupes`]
pub const DUPE_COUNT: &str = "dupe_count";

/// Rows whose combination of `key_columns` occurs more than once.
///
/// Rows come back in their original order with a `dupe_count` column equal
/// to the size of their group. Null matches Null. An empty key list uses
/// every column.
pub fn get_dupes(table: &Table, key_columns: &[&str]) -> Result<Table> {
    let key_indices: Vec<usize> = if key_columns.is_empty() {
        (0..table.column_count()).collect()
    } else {
        key_columns
            .iter()
            .map(|name| table.require_column(name))
            .collect::<Result<_>>()?
    };

    if table.column(DUPE_COUNT).is_some() {
        return Err(TableError::DuplicateColumn(DUPE_COUNT.to_string()));
    }

    let columns = table.columns();
    let key_of = |row: usize| -> Vec<&Cell> {
        key_indices.iter().map(|&i| &columns[i].cells[row]).collect()
    };

    let mut group_sizes: FxHashMap<Vec<&Cell>, usize> = FxHashMap::default();
    for row in 0..table.row_count() {
        *group_sizes.entry(key_of(row)).or_default() += 1;
    }

    let (rows, counts): (Vec<usize>, Vec<Cell>) = (0..table.row_count())
        .filter_map(|row| {
            let size = group_sizes[&key_of(row)];
            (size > 1).then(|| (row, Cell::Number(size as f64)))
        })
        .unzip();

    tracing::debug!(
        groups = group_sizes.values().filter(|&&n| n > 1).count(),
        rows = rows.len(),
        "found duplicate rows"
    );

    table
        .select_rows(&rows)
        .with_column(Column::new(DUPE_COUNT, counts))
}
