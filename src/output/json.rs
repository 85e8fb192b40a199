//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::inspect::Tabyl;
use crate::model::Table;

use super::OutputFormatter;

/// JSON output formatter: tables become arrays of row objects
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    fn write<T: Serialize>(&self, value: &T, writer: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonTabyl<'a> {
    dims: &'a [String],
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    layer: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spanning_header: Option<&'a str>,
    rows: Vec<Map<String, Value>>,
}

fn table_records(table: &Table) -> Result<Vec<Map<String, Value>>> {
    let names = table.names();
    (0..table.row_count())
        .map(|row| {
            names
                .iter()
                .zip(table.row(row))
                .map(|(name, cell)| -> Result<(String, Value)> {
                    Ok((name.to_string(), serde_json::to_value(cell)?))
                })
                .collect()
        })
        .collect()
}

impl OutputFormatter for JsonOutput {
    fn render_table(&self, table: &Table, writer: &mut dyn Write) -> Result<()> {
        self.write(&table_records(table)?, writer)
    }

    fn render_tabyls(&self, tabyls: &[Tabyl], writer: &mut dyn Write) -> Result<()> {
        let output = tabyls
            .iter()
            .map(|tabyl| -> Result<JsonTabyl<'_>> {
                Ok(JsonTabyl {
                    dims: tabyl.dims(),
                    state: tabyl.state().name(),
                    layer: tabyl.layer().map(serde_json::to_value).transpose()?,
                    spanning_header: tabyl.spanning_header(),
                    rows: table_records(tabyl.table())?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.write(&output, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Column};

    #[test]
    fn test_records() {
        let table = Table::new(vec![
            Column::new("name", vec!["Ann".into(), Cell::Null]),
            Column::from_values("age", [31, 40]),
        ])
        .unwrap();

        let mut out = Vec::new();
        JsonOutput::compact().render_table(&table, &mut out).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"name": "Ann", "age": 31.0},
                {"name": null, "age": 40.0}
            ])
        );
    }
}
