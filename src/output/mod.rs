//! Output formatting for cleaned tables and tabyls

mod csv;
mod json;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::inspect::Tabyl;
use crate::model::Table;

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::terminal::TerminalOutput;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render a table to a writer
    fn render_table(&self, table: &Table, writer: &mut dyn Write) -> Result<()>;

    /// Render one or more tabyls (several for a three-way tabulation)
    fn render_tabyls(&self, tabyls: &[Tabyl], writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Csv => Box::new(CsvOutput),
        }
    }
}

/// Label for the layer a tabyl was sliced from, e.g. `term = fall`
fn layer_caption(tabyl: &Tabyl) -> Option<String> {
    let layer = tabyl.layer()?;
    let dim = tabyl.dims().get(2).map(String::as_str).unwrap_or("layer");
    Some(format!("{} = {}", dim, layer))
}
