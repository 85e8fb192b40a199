//! Column and Table data structures

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{Result, TableError};

use super::cell::Cell;

/// A named sequence of cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column name (from header)
    pub name: String,
    /// Values in row order
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Build a column from anything convertible into cells
    pub fn from_values<T: Into<Cell>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = T>,
    ) -> Self {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every cell is Null or empty text
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }

    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }
}

/// An ordered set of equal-length, uniquely named columns.
///
/// Tables are value snapshots: every operation in this crate returns a new
/// table and leaves its input untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, checking that names are unique and lengths agree
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        if let Some(first) = columns.first() {
            if let Some(bad) = columns.iter().find(|c| c.len() != first.len()) {
                return Err(TableError::DimensionMismatch(format!(
                    "column '{}' has {} rows, column '{}' has {}",
                    bad.name,
                    bad.len(),
                    first.name,
                    first.len()
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Build a table from headers and row-major cells. Short rows are padded
    /// with Null; long rows are rejected.
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        let width = names.len();
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(TableError::DimensionMismatch(format!(
                    "row {} has {} cells but the table has {} columns",
                    row_idx + 1,
                    row.len(),
                    width
                )));
            }
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.cells.push(cells.next().unwrap_or(Cell::Null));
            }
        }

        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Resolve a column name, failing with `UnknownColumn`
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// Cells of one row in column order
    pub fn row(&self, row: usize) -> Vec<&Cell> {
        self.columns.iter().filter_map(|c| c.get(row)).collect()
    }

    /// Keep only the given rows, in the given order
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                Column::new(
                    c.name.clone(),
                    rows.iter().filter_map(|&r| c.get(r).cloned()).collect(),
                )
            })
            .collect();
        Table { columns }
    }

    /// Keep only the given columns, in the given order
    pub fn select_columns(&self, indices: &[usize]) -> Table {
        let columns = indices
            .iter()
            .filter_map(|&i| self.columns.get(i).cloned())
            .collect();
        Table { columns }
    }

    /// Append a column, or replace the column of the same name in place
    pub fn with_column(&self, column: Column) -> Result<Table> {
        if !self.columns.is_empty() && column.len() != self.row_count() {
            return Err(TableError::DimensionMismatch(format!(
                "column '{}' has {} rows, table has {}",
                column.name,
                column.len(),
                self.row_count()
            )));
        }

        let mut columns = self.columns.clone();
        match self.column_index(&column.name) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Ok(Table { columns })
    }

    /// Replace all column names at once
    pub fn with_names(&self, names: Vec<String>) -> Result<Table> {
        if names.len() != self.columns.len() {
            return Err(TableError::DimensionMismatch(format!(
                "{} names given for {} columns",
                names.len(),
                self.columns.len()
            )));
        }

        let columns = self
            .columns
            .iter()
            .zip(names)
            .map(|(c, name)| Column::new(name, c.cells.clone()))
            .collect();
        Table::new(columns)
    }
}
