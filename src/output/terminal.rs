//! Boxed grid output for the terminal

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::{Panel, Style};

use crate::inspect::Tabyl;
use crate::model::Table;

use super::{layer_caption, OutputFormatter};

/// Terminal output as box-drawn grids
#[derive(Debug, Default)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

fn build_grid(table: &Table, spanning_header: Option<&str>) -> String {
    if table.column_count() == 0 {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(table.names().into_iter().map(str::to_string));
    for row in 0..table.row_count() {
        builder.push_record(table.row(row).into_iter().map(|c| c.display().into_owned()));
    }

    let mut grid = builder.build();
    grid.with(Style::modern());
    if let Some(header) = spanning_header {
        grid.with(Panel::header(header));
    }
    grid.to_string()
}

impl OutputFormatter for TerminalOutput {
    fn render_table(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "{}", build_grid(table, None))?;
        let rows = table.row_count();
        writeln!(writer, "({} row{})", rows, if rows == 1 { "" } else { "s" })?;
        Ok(())
    }

    fn render_tabyls(&self, tabyls: &[Tabyl], writer: &mut dyn Write) -> Result<()> {
        for (i, tabyl) in tabyls.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            if let Some(caption) = layer_caption(tabyl) {
                writeln!(writer, "{}", caption)?;
            }
            writeln!(writer, "{}", build_grid(tabyl.table(), tabyl.spanning_header()))?;
        }
        Ok(())
    }
}
