//! Option enums and command configuration for tabclean

use std::path::PathBuf;

/// Output format for rendered tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "terminal" => Ok(OutputFormat::Terminal),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Casing applied to normalized column names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CaseStyle {
    /// `first_name`
    #[default]
    Snake,
    /// `firstName`
    SmallCamel,
    /// `FirstName`
    BigCamel,
    /// `FIRST_NAME`
    ScreamingSnake,
}

impl CaseStyle {
    /// Separator placed before a de-duplication suffix
    pub fn suffix_separator(self) -> &'static str {
        match self {
            CaseStyle::Snake | CaseStyle::ScreamingSnake => "_",
            CaseStyle::SmallCamel | CaseStyle::BigCamel => "",
        }
    }
}

impl std::str::FromStr for CaseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "snake" => Ok(CaseStyle::Snake),
            "small_camel" | "lower_camel" | "camel" => Ok(CaseStyle::SmallCamel),
            "big_camel" | "upper_camel" | "pascal" => Ok(CaseStyle::BigCamel),
            "screaming_snake" | "all_caps" => Ok(CaseStyle::ScreamingSnake),
            _ => Err(format!("Unknown case style: {}", s)),
        }
    }
}

/// Spreadsheet date system a serial number was written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateSystem {
    /// Windows default; carries the 1900 leap-year bug
    #[default]
    Excel1900,
    /// Classic Mac default; serial 0 is 1904-01-01
    Excel1904,
}

impl std::str::FromStr for DateSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1900" | "modern" => Ok(DateSystem::Excel1900),
            "1904" | "mac" | "mac pre-2011" => Ok(DateSystem::Excel1904),
            _ => Err(format!("Unknown date system: {}", s)),
        }
    }
}

/// Which structures `remove_empty` may drop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PruneTarget {
    Rows,
    Cols,
    #[default]
    Both,
}

impl PruneTarget {
    pub fn rows(self) -> bool {
        matches!(self, PruneTarget::Rows | PruneTarget::Both)
    }

    pub fn cols(self) -> bool {
        matches!(self, PruneTarget::Cols | PruneTarget::Both)
    }
}

impl std::str::FromStr for PruneTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rows" | "row" => Ok(PruneTarget::Rows),
            "cols" | "col" | "columns" => Ok(PruneTarget::Cols),
            "both" | "rows,cols" | "cols,rows" => Ok(PruneTarget::Both),
            _ => Err(format!("Unknown prune target: {}", s)),
        }
    }
}

/// Where `add_totals` appends its sums
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsAxis {
    /// A "Total" row of column sums
    Row,
    /// A "Total" column of row sums
    Col,
    Both,
}

impl std::str::FromStr for TotalsAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "row" => Ok(TotalsAxis::Row),
            "col" | "column" => Ok(TotalsAxis::Col),
            "both" => Ok(TotalsAxis::Both),
            _ => Err(format!("Unknown totals axis: {}", s)),
        }
    }
}

/// Denominator used by `to_percentages`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentAxis {
    /// Fraction of the row total
    Row,
    /// Fraction of the column total
    Col,
    /// Fraction of the grand total
    All,
}

impl std::str::FromStr for PercentAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "row" => Ok(PercentAxis::Row),
            "col" | "column" => Ok(PercentAxis::Col),
            "all" => Ok(PercentAxis::All),
            _ => Err(format!("Unknown percentage axis: {}", s)),
        }
    }
}

/// How `add_ns` shows the underlying counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NsStyle {
    /// `75.0% (3)`
    Combined,
    /// `3 (75.0%)`
    CombinedFront,
    /// A count column next to each percentage column
    Separate,
}

impl std::str::FromStr for NsStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "combined" | "rear" => Ok(NsStyle::Combined),
            "front" | "combined_front" => Ok(NsStyle::CombinedFront),
            "separate" => Ok(NsStyle::Separate),
            _ => Err(format!("Unknown ns style: {}", s)),
        }
    }
}

/// How `add_title` labels the dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// Corner header reads `row_var/col_var`
    Combined,
    /// Corner header is the row variable; the column variable becomes a
    /// spanning header above the value columns
    Top,
}

impl std::str::FromStr for TitleStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "combined" => Ok(TitleStyle::Combined),
            "top" => Ok(TitleStyle::Top),
            _ => Err(format!("Unknown title style: {}", s)),
        }
    }
}

/// Configuration for a cleaning / tabulation run
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file
    pub input: PathBuf,
    /// For spreadsheets: which sheet to read
    pub sheet_name: Option<String>,
    /// Case style for header normalization; None keeps raw headers
    pub case_style: Option<CaseStyle>,
    /// Drop empty rows and/or columns
    pub prune: Option<PruneTarget>,
    /// Drop columns holding a single value
    pub remove_constant: bool,
    /// Numeric columns to decode as spreadsheet date serials
    pub date_columns: Vec<String>,
    /// Date system of those serials
    pub date_system: DateSystem,
    /// Promote this data row (0-based) to headers, dropping rows above it
    pub header_row: Option<usize>,
    /// Merge groups of columns, first non-null wins: (sources, target)
    pub coalesce: Vec<(Vec<String>, String)>,
    /// Key columns for duplicate detection; empty means every column
    pub key_columns: Vec<String>,
    /// Columns to cross-tabulate
    pub dims: Vec<String>,
    /// Count Null as a tabulation level
    pub show_na: bool,
    /// Keep declared or observed levels whose count is zero
    pub show_missing_levels: bool,
    /// Steps applied to each tabyl
    pub adornments: Adornments,
    /// Output format
    pub output_format: OutputFormat,
}

/// Adornment steps to apply, in pipeline order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adornments {
    pub totals: Option<TotalsAxis>,
    pub percentages: Option<PercentAxis>,
    /// Decimals for formatted percentages; formatting is skipped without
    /// percentages
    pub digits: u32,
    pub ns: Option<NsStyle>,
    pub title: Option<TitleStyle>,
}

impl Adornments {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the steps can run in pipeline order. A title goes on counts or
    /// on annotated percentages, never on bare formatted ones.
    pub fn validate(&self) -> Result<(), String> {
        if self.ns.is_some() && self.percentages.is_none() {
            return Err("counts can only be shown next to percentages".to_string());
        }
        if self.title.is_some() && self.percentages.is_some() && self.ns.is_none() {
            return Err(
                "a title on percentages needs the counts shown next to them (ns)".to_string(),
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            sheet_name: None,
            case_style: None,
            prune: None,
            remove_constant: false,
            date_columns: Vec::new(),
            date_system: DateSystem::default(),
            header_row: None,
            coalesce: Vec::new(),
            key_columns: Vec::new(),
            dims: Vec::new(),
            show_na: true,
            show_missing_levels: true,
            adornments: Adornments::default(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Create a new Config for an input file
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            ..Default::default()
        }
    }

    /// Set spreadsheet sheet name
    pub fn with_sheet_name(mut self, name: String) -> Self {
        self.sheet_name = Some(name);
        self
    }

    /// Normalize headers with the given case style
    pub fn with_case_style(mut self, style: CaseStyle) -> Self {
        self.case_style = Some(style);
        self
    }

    /// Drop empty rows/columns
    pub fn with_prune(mut self, target: PruneTarget) -> Self {
        self.prune = Some(target);
        self
    }

    /// Drop constant columns
    pub fn with_remove_constant(mut self, remove: bool) -> Self {
        self.remove_constant = remove;
        self
    }

    /// Decode these columns as date serials
    pub fn with_date_columns(mut self, columns: Vec<String>, system: DateSystem) -> Self {
        self.date_columns = columns;
        self.date_system = system;
        self
    }

    /// Promote a data row to headers
    pub fn with_header_row(mut self, row: usize) -> Self {
        self.header_row = Some(row);
        self
    }

    /// Coalesce `sources` into `into`
    pub fn with_coalesce(mut self, sources: Vec<String>, into: String) -> Self {
        self.coalesce.push((sources, into));
        self
    }

    /// Set key columns for duplicate detection
    pub fn with_key_columns(mut self, columns: Vec<String>) -> Self {
        self.key_columns = columns;
        self
    }

    /// Set tabulation dimensions and level handling
    pub fn with_dims(mut self, dims: Vec<String>, show_na: bool, show_missing_levels: bool) -> Self {
        self.dims = dims;
        self.show_na = show_na;
        self.show_missing_levels = show_missing_levels;
        self
    }

    pub fn with_adornments(mut self, adornments: Adornments) -> Self {
        self.adornments = adornments;
        self
    }

    /// Set output format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }
}
