//! Structural pruning of empty rows/columns and constant columns

use rustc_hash::FxHashSet;

use crate::config::PruneTarget;
use crate::model::{Cell, Table};

/// Drop rows and/or columns in which every cell is Null or empty text.
///
/// Retained rows and columns keep their relative order. A row or column with
/// at least one non-blank cell is never removed.
pub fn remove_empty(table: &Table, target: PruneTarget) -> Table {
    let keep_cols: Vec<usize> = if target.cols() {
        (0..table.column_count())
            .filter(|&i| !table.columns()[i].is_blank())
            .collect()
    } else {
        (0..table.column_count()).collect()
    };

    let keep_rows: Vec<usize> = if target.rows() {
        (0..table.row_count())
            .filter(|&r| !table.row(r).into_iter().all(Cell::is_blank))
            .collect()
    } else {
        (0..table.row_count()).collect()
    };

    tracing::debug!(
        rows_removed = table.row_count() - keep_rows.len(),
        cols_removed = table.column_count() - keep_cols.len(),
        "removed empty structures"
    );

    table.select_columns(&keep_cols).select_rows(&keep_rows)
}

/// Drop columns that hold a single distinct value.
///
/// With `ignore_null`, Null cells do not count as a value, so a column of
/// `5, Null, 5` is constant. Columns of only Nulls are always constant.
pub fn remove_constant(table: &Table, ignore_null: bool) -> Table {
    let keep: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| {
            let distinct: FxHashSet<&Cell> = column
                .cells
                .iter()
                .filter(|c| !(ignore_null && c.is_null()))
                .collect();
            distinct.len() > 1
        })
        .map(|(i, _)| i)
        .collect();

    tracing::debug!(
        cols_removed = table.column_count() - keep.len(),
        "removed constant columns"
    );

    table.select_columns(&keep)
}
