//! The load, clean, inspect sequence behind each command

use anyhow::{Context, Result};

use crate::clean::{
    coalesce_columns, convert_excel_dates, remove_constant, remove_empty, row_to_names,
};
use crate::config::{Adornments, Config};
use crate::inspect::{get_dupes, Tabulator, Tabyl};
use crate::model::Table;
use crate::parser::{ParserFactory, Sheet};

/// Load the input file and settle its headers.
///
/// With a header row configured the file's own header line is discarded
/// and that data row is promoted instead; otherwise the file headers are
/// normalized when a case style is set.
pub fn load(config: &Config) -> Result<Table> {
    let sheet = ParserFactory::new()
        .parse(&config.input, config)
        .with_context(|| format!("Failed to parse file: {}", config.input.display()))?;

    let table = match config.header_row {
        Some(row) => {
            let width = sheet.rows.iter().map(Vec::len).max().unwrap_or(0);
            let positional = Sheet {
                headers: (1..=width).map(|i| format!("Column{}", i)).collect(),
                rows: sheet.rows,
            };
            let table = positional.into_table(None)?;
            row_to_names(&table, row, config.case_style.unwrap_or_default(), true)
                .with_context(|| format!("Failed to use row {} as headers", row))?
        }
        None => sheet
            .into_table(config.case_style)
            .context("Failed to build table (normalize headers with --case to fix repeated names)")?,
    };

    Ok(table)
}

/// Apply the configured cleaning steps: coalescing, date decoding, then
/// pruning.
pub fn clean(table: Table, config: &Config) -> Result<Table> {
    let mut table = table;

    for (sources, into) in &config.coalesce {
        let sources: Vec<&str> = sources.iter().map(String::as_str).collect();
        table = coalesce_columns(&table, &sources, into)?;
    }

    for column in &config.date_columns {
        table = convert_excel_dates(&table, column, config.date_system)
            .with_context(|| format!("Failed to decode dates in column '{}'", column))?;
    }

    if let Some(target) = config.prune {
        table = remove_empty(&table, target);
    }
    if config.remove_constant {
        table = remove_constant(&table, false);
    }

    Ok(table)
}

/// Duplicate rows over the configured key columns
pub fn dupes(table: &Table, config: &Config) -> Result<Table> {
    let keys: Vec<&str> = config.key_columns.iter().map(String::as_str).collect();
    Ok(get_dupes(table, &keys)?)
}

/// Cross-tabulate the configured dimensions and adorn every resulting tabyl
pub fn tabyls(table: &Table, config: &Config) -> Result<Vec<Tabyl>> {
    check_adornments(&config.adornments)?;

    let tabulation = Tabulator::new(&config.dims)
        .show_na(config.show_na)
        .show_missing_levels(config.show_missing_levels)
        .tabulate(table)?;

    tabulation
        .to_tabyls()?
        .into_iter()
        .map(|tabyl| adorn(tabyl, &config.adornments))
        .collect()
}

fn check_adornments(adornments: &Adornments) -> Result<()> {
    adornments
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid adornments: {}", e))
}

/// Run the requested adornments in pipeline order
pub fn adorn(tabyl: Tabyl, adornments: &Adornments) -> Result<Tabyl> {
    check_adornments(adornments)?;

    let mut tabyl = tabyl;
    if let Some(axis) = adornments.totals {
        tabyl = tabyl.add_totals(axis)?;
    }
    if let Some(axis) = adornments.percentages {
        tabyl = tabyl
            .to_percentages(axis)?
            .format_percentages(adornments.digits, "%")?;
        if let Some(style) = adornments.ns {
            tabyl = tabyl.add_ns(style)?;
        }
    }
    if let Some(style) = adornments.title {
        tabyl = tabyl.add_title(style)?;
    }
    Ok(tabyl)
}
