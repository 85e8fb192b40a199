//! CSV output format

use std::io::Write;

use anyhow::Result;

use crate::inspect::Tabyl;
use crate::model::{Cell, Table};

use super::OutputFormatter;

/// CSV output; Null cells are written as empty fields
pub struct CsvOutput;

fn write_table(table: &Table, writer: &mut dyn Write) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(table.names())?;
    for row in 0..table.row_count() {
        csv_writer.write_record(table.row(row).into_iter().map(|cell| match cell {
            Cell::Null => String::new(),
            other => other.display().into_owned(),
        }))?;
    }
    csv_writer.flush()?;
    Ok(())
}

impl OutputFormatter for CsvOutput {
    fn render_table(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        write_table(table, writer)
    }

    // Layers are written one after another, each with its own header row
    fn render_tabyls(&self, tabyls: &[Tabyl], writer: &mut dyn Write) -> Result<()> {
        for tabyl in tabyls {
            write_table(tabyl.table(), writer)?;
        }
        Ok(())
    }
}
