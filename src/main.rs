//! tabclean - Cleaning and cross-tabulation for tabular data

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tabclean::config::{
    Adornments, CaseStyle, Config, DateSystem, NsStyle, OutputFormat, PercentAxis, PruneTarget,
    TitleStyle, TotalsAxis,
};
use tabclean::output::OutputFactory;
use tabclean::pipeline;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Csv,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Csv => OutputFormat::Csv,
        }
    }
}

/// Clean messy tabular data and cross-tabulate it (CSV, Excel)
#[derive(Parser, Debug)]
#[command(name = "tabclean")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log cleaning steps to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a table and print it
    Clean(CleanArgs),
    /// Print rows that share the same key values
    Dupes {
        #[command(flatten)]
        clean: CleanArgs,

        /// Key column(s) (comma-separated); all columns when omitted
        #[arg(short, long, value_delimiter = ',')]
        key: Vec<String>,
    },
    /// Count combinations of one to three columns
    Tabyl {
        #[command(flatten)]
        clean: CleanArgs,

        /// Column(s) to tabulate (comma-separated, at most 3)
        #[arg(short, long, value_delimiter = ',', required = true)]
        by: Vec<String>,

        /// Append totals: row, col or both
        #[arg(long)]
        totals: Option<TotalsAxis>,

        /// Show percentages of the row, col or all total
        #[arg(long)]
        percent: Option<PercentAxis>,

        /// Decimal places for percentages
        #[arg(long, default_value_t = 1)]
        digits: u32,

        /// Show counts next to percentages: combined, front or separate
        #[arg(long, requires = "percent")]
        ns: Option<NsStyle>,

        /// Name the dimensions in the header: combined or top
        #[arg(long)]
        title: Option<TitleStyle>,

        /// Leave out rows with a missing value in any tabulated column
        #[arg(long)]
        no_na: bool,

        /// Drop levels with a zero count
        #[arg(long)]
        hide_missing_levels: bool,
    },
}

/// Loading and cleaning options shared by every command
#[derive(Args, Debug)]
struct CleanArgs {
    /// Input file (csv, tsv, xlsx, xls, ods)
    input: PathBuf,

    /// For Excel files: which sheet to read
    #[arg(long)]
    sheet: Option<String>,

    /// Normalize headers: snake, small_camel, big_camel, screaming_snake
    #[arg(long)]
    case: Option<CaseStyle>,

    /// Use this data row (0-based) as the header, dropping rows above it
    #[arg(long)]
    header_row: Option<usize>,

    /// Drop empty rows, cols or both
    #[arg(long)]
    prune: Option<PruneTarget>,

    /// Drop columns holding a single value
    #[arg(long)]
    remove_constant: bool,

    /// Column(s) of spreadsheet date serials to decode (comma-separated)
    #[arg(long, value_delimiter = ',')]
    dates: Vec<String>,

    /// Date system of those serials: 1900 or 1904
    #[arg(long, default_value = "1900")]
    date_system: DateSystem,

    /// Merge columns, first non-missing wins, as `a,b,c=target`
    #[arg(long)]
    coalesce: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,
}

impl CleanArgs {
    fn into_config(self) -> Result<Config> {
        let mut config = Config::new(self.input)
            .with_remove_constant(self.remove_constant)
            .with_date_columns(self.dates, self.date_system)
            .with_output_format(self.format.into());

        if let Some(sheet) = self.sheet {
            config = config.with_sheet_name(sheet);
        }
        if let Some(style) = self.case {
            config = config.with_case_style(style);
        }
        if let Some(row) = self.header_row {
            config = config.with_header_row(row);
        }
        if let Some(target) = self.prune {
            config = config.with_prune(target);
        }
        for arg in self.coalesce {
            let (sources, into) = parse_coalesce(&arg)?;
            config = config.with_coalesce(sources, into);
        }

        Ok(config)
    }
}

fn parse_coalesce(arg: &str) -> Result<(Vec<String>, String)> {
    let Some((sources, into)) = arg.split_once('=') else {
        bail!("Invalid --coalesce '{}': expected a,b=target", arg);
    };
    let sources: Vec<String> = sources
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if sources.is_empty() || into.trim().is_empty() {
        bail!("Invalid --coalesce '{}': expected a,b=target", arg);
    }
    Ok((sources, into.trim().to_string()))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "tabclean=debug",
        _ => "tabclean=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> Result<()> {
    let mut stdout = std::io::stdout();

    match command {
        Command::Clean(args) => {
            let config = args.into_config()?;
            let table = pipeline::clean(pipeline::load(&config)?, &config)?;
            OutputFactory::create(config.output_format).render_table(&table, &mut stdout)
        }
        Command::Dupes { clean, key } => {
            let config = clean.into_config()?.with_key_columns(key);
            let table = pipeline::clean(pipeline::load(&config)?, &config)?;
            let dupes = pipeline::dupes(&table, &config)?;
            tracing::info!(rows = dupes.row_count(), "duplicate rows");
            OutputFactory::create(config.output_format).render_table(&dupes, &mut stdout)
        }
        Command::Tabyl {
            clean,
            by,
            totals,
            percent,
            digits,
            ns,
            title,
            no_na,
            hide_missing_levels,
        } => {
            let config = clean
                .into_config()?
                .with_dims(by, !no_na, !hide_missing_levels)
                .with_adornments(Adornments {
                    totals,
                    percentages: percent,
                    digits,
                    ns,
                    title,
                });
            let table = pipeline::clean(pipeline::load(&config)?, &config)?;
            let tabyls = pipeline::tabyls(&table, &config)?;
            OutputFactory::create(config.output_format).render_tabyls(&tabyls, &mut stdout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coalesce() {
        assert_eq!(
            parse_coalesce("work, home=phone").unwrap(),
            (vec!["work".to_string(), "home".to_string()], "phone".to_string())
        );
        assert!(parse_coalesce("work,home").is_err());
        assert!(parse_coalesce("=phone").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
