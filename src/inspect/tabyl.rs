//! One- to three-way contingency tables
//!
//! A [`Tabulation`] counts every combination of levels across up to three
//! columns. Levels are the distinct observed values of a column in natural
//! order with the missing (Null) level last, optionally preceded by
//! declared levels that may not occur in the data.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use crate::error::{Result, TableError};
use crate::model::{Cell, Table};

use super::adorn::Tabyl;

/// Largest number of dimensions a tabulation accepts
pub const MAX_DIMS: usize = 3;

/// Counts over the cartesian product of each dimension's levels
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulation {
    dims: Vec<String>,
    levels: Vec<Vec<Cell>>,
    /// Row-major over `levels`, last dimension varying fastest
    counts: Vec<u64>,
}

impl Tabulation {
    /// Dimension (column) names
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Levels of one dimension, in output order
    pub fn levels(&self, dim: usize) -> Option<&[Cell]> {
        self.levels.get(dim).map(Vec::as_slice)
    }

    /// Number of levels per dimension
    pub fn shape(&self) -> Vec<usize> {
        self.levels.iter().map(Vec::len).collect()
    }

    /// Count for one combination of level indices
    pub fn count(&self, index: &[usize]) -> Option<u64> {
        flat_index(&self.shape(), index).and_then(|i| self.counts.get(i).copied())
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Render as count tables: one for one or two dimensions, one per level
    /// of the third dimension otherwise.
    pub fn to_tabyls(&self) -> Result<Vec<Tabyl>> {
        let shape = self.shape();
        match self.dims.len() {
            1 => {
                let counts = self.counts.iter().map(|&n| vec![n as f64]).collect();
                Ok(vec![Tabyl::new(
                    self.dims.clone(),
                    None,
                    self.levels[0].clone(),
                    vec!["n".to_string()],
                    counts,
                )?])
            }
            2 => Ok(vec![self.slice_2d(&shape, None)?]),
            _ => (0..shape[2])
                .map(|layer| self.slice_2d(&shape, Some(layer)))
                .collect(),
        }
    }

    fn slice_2d(&self, shape: &[usize], layer: Option<usize>) -> Result<Tabyl> {
        let counts = (0..shape[0])
            .map(|r| {
                (0..shape[1])
                    .map(|c| {
                        let index = match layer {
                            Some(l) => vec![r, c, l],
                            None => vec![r, c],
                        };
                        self.count(&index).unwrap_or(0) as f64
                    })
                    .collect()
            })
            .collect();

        Tabyl::new(
            self.dims.clone(),
            layer.map(|l| self.levels[2][l].clone()),
            self.levels[0].clone(),
            self.levels[1].iter().map(|c| c.display().into_owned()).collect(),
            counts,
        )
    }
}

fn flat_index(shape: &[usize], index: &[usize]) -> Option<usize> {
    if index.len() != shape.len() {
        return None;
    }
    let mut flat = 0;
    for (&i, &size) in index.iter().zip(shape) {
        if i >= size {
            return None;
        }
        flat = flat * size + i;
    }
    Some(flat)
}

/// Builder for a tabulation over 1-3 columns
#[derive(Debug, Clone)]
pub struct Tabulator {
    dims: Vec<String>,
    show_na: bool,
    show_missing_levels: bool,
    declared: FxHashMap<String, Vec<Cell>>,
}

impl Tabulator {
    /// Tabulate the given columns; Null is counted as its own level and
    /// declared-but-unobserved levels are kept.
    pub fn new<S: AsRef<str>>(dims: &[S]) -> Self {
        Self {
            dims: dims.iter().map(|d| d.as_ref().to_string()).collect(),
            show_na: true,
            show_missing_levels: true,
            declared: FxHashMap::default(),
        }
    }

    /// Count Null as a level. When false, rows with a Null in any dimension
    /// are left out of the counts.
    pub fn show_na(mut self, show: bool) -> Self {
        self.show_na = show;
        self
    }

    /// Keep levels whose total count is zero
    pub fn show_missing_levels(mut self, show: bool) -> Self {
        self.show_missing_levels = show;
        self
    }

    /// Declare the levels of a dimension up front, in display order.
    /// Observed values not declared follow in natural order.
    pub fn with_levels(mut self, dim: &str, levels: Vec<Cell>) -> Self {
        self.declared.insert(dim.to_string(), levels);
        self
    }

    pub fn tabulate(&self, table: &Table) -> Result<Tabulation> {
        if self.dims.is_empty() || self.dims.len() > MAX_DIMS {
            return Err(TableError::DimensionMismatch(format!(
                "tabulation takes 1 to {} dimensions, got {}",
                MAX_DIMS,
                self.dims.len()
            )));
        }
        if let Some(unknown) = self.declared.keys().find(|d| !self.dims.contains(d)) {
            return Err(TableError::UnknownColumn(unknown.clone()));
        }

        let columns = self
            .dims
            .iter()
            .map(|d| table.require_column(d).map(|i| &table.columns()[i]))
            .collect::<Result<Vec<_>>>()?;

        let levels: Vec<Vec<Cell>> = columns
            .iter()
            .map(|column| self.levels_for(&column.name, &column.cells))
            .collect();
        let lookup: Vec<FxHashMap<&Cell, usize>> = levels
            .iter()
            .map(|lv| lv.iter().enumerate().map(|(i, c)| (c, i)).collect())
            .collect();

        let shape: Vec<usize> = levels.iter().map(Vec::len).collect();
        let mut counts = vec![0u64; shape.iter().product()];
        let mut skipped = 0usize;

        for row in 0..table.row_count() {
            let index: Option<Vec<usize>> = columns
                .iter()
                .zip(&lookup)
                .map(|(column, lookup)| lookup.get(&column.cells[row]).copied())
                .collect();
            match index.and_then(|index| flat_index(&shape, &index)) {
                Some(flat) => counts[flat] += 1,
                None => skipped += 1,
            }
        }

        let mut tabulation = Tabulation {
            dims: self.dims.clone(),
            levels,
            counts,
        };
        if !self.show_missing_levels {
            tabulation = drop_empty_levels(tabulation);
        }

        tracing::debug!(
            dims = ?tabulation.dims,
            shape = ?tabulation.shape(),
            counted = tabulation.total(),
            skipped,
            "tabulated"
        );

        Ok(tabulation)
    }

    fn levels_for(&self, dim: &str, cells: &[Cell]) -> Vec<Cell> {
        let mut levels: IndexSet<Cell> = self
            .declared
            .get(dim)
            .map(|declared| declared.iter().filter(|c| !c.is_null()).cloned().collect())
            .unwrap_or_default();

        let mut observed: Vec<&Cell> = cells
            .iter()
            .filter(|c| !c.is_null() && !levels.contains(*c))
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        observed.sort();
        levels.extend(observed.into_iter().cloned());

        if self.show_na && cells.iter().any(Cell::is_null) {
            levels.insert(Cell::Null);
        }
        levels.into_iter().collect()
    }
}

/// Remove levels whose marginal count is zero, dimension by dimension
fn drop_empty_levels(tabulation: Tabulation) -> Tabulation {
    let shape = tabulation.shape();

    let mut marginals: Vec<Vec<u64>> = shape.iter().map(|&n| vec![0; n]).collect();
    for (flat, &count) in tabulation.counts.iter().enumerate() {
        for (dim, index) in unflatten(&shape, flat).into_iter().enumerate() {
            marginals[dim][index] += count;
        }
    }

    let kept: Vec<Vec<usize>> = marginals
        .iter()
        .map(|m| (0..m.len()).filter(|&i| m[i] > 0).collect())
        .collect();
    let new_shape: Vec<usize> = kept.iter().map(Vec::len).collect();

    let mut counts = vec![0u64; new_shape.iter().product()];
    for (new_flat, slot) in counts.iter_mut().enumerate() {
        let old_index: Vec<usize> = unflatten(&new_shape, new_flat)
            .into_iter()
            .enumerate()
            .map(|(dim, i)| kept[dim][i])
            .collect();
        if let Some(old_flat) = flat_index(&shape, &old_index) {
            *slot = tabulation.counts[old_flat];
        }
    }

    let levels = tabulation
        .levels
        .iter()
        .zip(&kept)
        .map(|(levels, keep)| keep.iter().map(|&i| levels[i].clone()).collect())
        .collect();

    Tabulation {
        dims: tabulation.dims,
        levels,
        counts,
    }
}

fn unflatten(shape: &[usize], mut flat: usize) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for (slot, &size) in index.iter_mut().zip(shape).rev() {
        *slot = flat % size;
        flat /= size;
    }
    index
}

/// Count every combination of values in `dims`, Null included as a level
pub fn tabulate<S: AsRef<str>>(
    table: &Table,
    dims: &[S],
    show_missing_levels: bool,
) -> Result<Tabulation> {
    Tabulator::new(dims)
        .show_missing_levels(show_missing_levels)
        .tabulate(table)
}
