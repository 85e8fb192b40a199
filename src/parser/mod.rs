//! Loaders turning CSV and spreadsheet files into raw sheets

mod csv;
mod excel;

use std::path::Path;

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::clean::normalize_names;
use crate::config::{CaseStyle, Config};
use crate::error::TableError;
use crate::model::{Cell, Table};

pub use self::csv::CsvParser;
pub use self::excel::ExcelParser;

/// Headers and rows exactly as read from a file.
///
/// Raw headers may be blank or repeated, which a [`Table`] does not allow,
/// so they stay separate until normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Build a table, normalizing headers in `style` when given. Raw
    /// headers must already be unique otherwise.
    pub fn into_table(self, style: Option<CaseStyle>) -> std::result::Result<Table, TableError> {
        let headers = match style {
            Some(style) => normalize_names(&self.headers, style),
            None => self.headers,
        };
        Table::from_rows(headers, self.rows)
    }
}

/// Trait for loading tabular data files
pub trait Parser: Send + Sync {
    /// Load a file into a raw sheet
    fn parse(&self, path: &Path, config: &Config) -> Result<Sheet>;

    /// Check if this parser can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Factory for creating parsers based on file extension
pub struct ParserFactory {
    parsers: Vec<Box<dyn Parser>>,
}

impl Default for ParserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserFactory {
    /// Create a new parser factory with all supported parsers
    pub fn new() -> Self {
        Self {
            parsers: vec![Box::new(CsvParser), Box::new(ExcelParser)],
        }
    }

    /// Get a parser for the given file path
    pub fn get_parser(&self, path: &Path) -> Result<&dyn Parser> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        for parser in &self.parsers {
            if parser.supports_extension(&ext) {
                return Ok(parser.as_ref());
            }
        }

        bail!(
            "Unsupported file format: {}",
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
        )
    }

    /// Parse a file using the appropriate parser
    pub fn parse(&self, path: &Path, config: &Config) -> Result<Sheet> {
        let parser = self.get_parser(path)?;
        let sheet = parser.parse(path, config)?;
        tracing::debug!(
            path = %path.display(),
            columns = sheet.headers.len(),
            rows = sheet.rows.len(),
            "loaded sheet"
        );
        Ok(sheet)
    }
}

/// Tag a text value with the narrowest cell type it reads as
pub fn infer_cell(s: &str) -> Cell {
    let trimmed = s.trim();

    if trimmed.is_empty() || trimmed == "NA" || trimmed.eq_ignore_ascii_case("null") {
        return Cell::Null;
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Cell::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Cell::Boolean(false);
    }

    // "nan" and "inf" parse as f64 but are text in a spreadsheet
    if trimmed.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')) {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return Cell::Number(n);
            }
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Cell::Date(date);
    }

    Cell::Text(trimmed.to_string())
}
