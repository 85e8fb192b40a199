//! Display adornments for count tables
//!
//! A [`Tabyl`] is a count table tagged with how far along the adornment
//! pipeline it is. Each step checks the tag, returns a new tabyl and leaves
//! the input untouched:
//!
//! ```text
//! Raw -> Totaled -> Proportioned -> Formatted -> Annotated -> Titled
//! ```
//!
//! Steps may be skipped but never reordered.

use rustc_hash::FxHashSet;

use crate::config::{NsStyle, PercentAxis, TitleStyle, TotalsAxis};
use crate::error::{Result, TableError};
use crate::model::{Cell, Column, Table};

/// Label of the row and column appended by [`Tabyl::add_totals`]
pub const TOTAL_LABEL: &str = "Total";

/// Position of a tabyl in the adornment pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdornState {
    Raw,
    Totaled,
    Proportioned,
    Formatted,
    Annotated,
    Titled,
}

impl AdornState {
    pub fn name(self) -> &'static str {
        match self {
            AdornState::Raw => "raw",
            AdornState::Totaled => "totaled",
            AdornState::Proportioned => "proportioned",
            AdornState::Formatted => "formatted",
            AdornState::Annotated => "annotated",
            AdornState::Titled => "titled",
        }
    }
}

/// Round to `digits` decimals with halves going away from zero.
///
/// Fractions scaled by 100 sit just below a half often enough (0.125 * 100
/// is 12.499999...) that a small tolerance is added before truncating.
pub fn round_half_up(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    let scaled = value.abs() * scale + 0.5 + f64::EPSILON.sqrt();
    value.signum() * scaled.trunc() / scale
}

/// A count table moving through the adornment pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Tabyl {
    state: AdornState,
    /// Tabulated column names: row variable, then column and layer variables
    dims: Vec<String>,
    layer: Option<Cell>,
    row_labels: Vec<Cell>,
    col_labels: Vec<String>,
    /// Raw counts, including any total row/column
    counts: Vec<Vec<f64>>,
    total_row: bool,
    total_col: bool,
    fractions: Option<Vec<Vec<f64>>>,
    formatted: Option<Vec<Vec<String>>>,
    ns: Option<NsStyle>,
    corner: String,
    spanning_header: Option<String>,
    table: Table,
}

impl Tabyl {
    pub(crate) fn new(
        dims: Vec<String>,
        layer: Option<Cell>,
        row_labels: Vec<Cell>,
        col_labels: Vec<String>,
        counts: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let corner = dims.first().cloned().unwrap_or_default();
        let mut tabyl = Self {
            state: AdornState::Raw,
            dims,
            layer,
            row_labels,
            col_labels,
            counts,
            total_row: false,
            total_col: false,
            fractions: None,
            formatted: None,
            ns: None,
            corner,
            spanning_header: None,
            table: Table::default(),
        };
        tabyl.table = tabyl.render()?;
        Ok(tabyl)
    }

    pub fn state(&self) -> AdornState {
        self.state
    }

    /// Current rendering: a label column followed by one value column per
    /// column level (plus totals and count columns as adorned)
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Level of the third dimension this tabyl is a slice of
    pub fn layer(&self) -> Option<&Cell> {
        self.layer.as_ref()
    }

    /// Raw counts by row and column, totals included once added
    pub fn counts(&self) -> &[Vec<f64>] {
        &self.counts
    }

    /// Fractions by row and column once proportioned
    pub fn fractions(&self) -> Option<&[Vec<f64>]> {
        self.fractions.as_deref()
    }

    /// Header spanning the value columns, set by a top-style title
    pub fn spanning_header(&self) -> Option<&str> {
        self.spanning_header.as_deref()
    }

    fn expect_state(&self, step: &'static str, allowed: &[AdornState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(TableError::InvalidPipelineState {
                step,
                state: self.state.name(),
            })
        }
    }

    fn advance(mut self, state: AdornState) -> Result<Self> {
        self.state = state;
        self.table = self.render()?;
        tracing::trace!(state = state.name(), "adorned tabyl");
        Ok(self)
    }

    fn data_rows(&self) -> usize {
        self.counts.len() - usize::from(self.total_row)
    }

    fn data_cols(&self) -> usize {
        self.col_labels.len()
    }

    /// Append a "Total" row of column sums, a "Total" column of row sums, or
    /// both (the corner cell then holds the grand total).
    pub fn add_totals(&self, axis: TotalsAxis) -> Result<Self> {
        self.expect_state("add_totals", &[AdornState::Raw])?;
        let mut next = self.clone();

        if matches!(axis, TotalsAxis::Col | TotalsAxis::Both) {
            for row in &mut next.counts {
                let sum: f64 = row.iter().sum();
                row.push(sum);
            }
            next.total_col = true;
        }
        if matches!(axis, TotalsAxis::Row | TotalsAxis::Both) {
            // a tabulation with no rows still has its value columns
            let width = next.data_cols() + usize::from(next.total_col);
            let sums = (0..width)
                .map(|c| next.counts.iter().map(|row| row[c]).sum::<f64>())
                .collect();
            next.counts.push(sums);
            next.total_row = true;
        }

        next.advance(AdornState::Totaled)
    }

    /// Replace counts with fractions of the row total, column total or grand
    /// total. Denominators cover the data cells only, so a total row or
    /// column comes out at 1 along its own axis.
    pub fn to_percentages(&self, axis: PercentAxis) -> Result<Self> {
        self.expect_state("to_percentages", &[AdornState::Raw, AdornState::Totaled])?;
        let (rows, cols) = (self.data_rows(), self.data_cols());

        let row_sum = |r: usize| self.counts[r][..cols].iter().sum::<f64>();
        let col_sum = |c: usize| self.counts[..rows].iter().map(|row| row[c]).sum::<f64>();
        let grand: f64 = (0..rows).map(row_sum).sum();

        let fractions = self
            .counts
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, &n)| {
                        let denominator = match axis {
                            PercentAxis::Row => row_sum(r),
                            // the total column's denominator is the grand total
                            PercentAxis::Col if c >= cols => grand,
                            PercentAxis::Col => col_sum(c),
                            PercentAxis::All => grand,
                        };
                        if denominator == 0.0 {
                            f64::NAN
                        } else {
                            n / denominator
                        }
                    })
                    .collect()
            })
            .collect();

        let mut next = self.clone();
        next.fractions = Some(fractions);
        next.advance(AdornState::Proportioned)
    }

    /// Render fractions as percentages with `digits` decimals and `suffix`,
    /// rounding halves up. Undefined fractions (zero denominators) render
    /// as "-".
    pub fn format_percentages(&self, digits: u32, suffix: &str) -> Result<Self> {
        let fractions = match (&self.fractions, self.state) {
            (Some(fractions), AdornState::Proportioned) => fractions,
            (None, AdornState::Raw | AdornState::Totaled) => {
                return Err(TableError::TypeMismatch {
                    expected: "proportions",
                    found: "counts".to_string(),
                })
            }
            _ => {
                return Err(TableError::InvalidPipelineState {
                    step: "format_percentages",
                    state: self.state.name(),
                })
            }
        };

        let formatted = fractions
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&f| {
                        if f.is_nan() {
                            "-".to_string()
                        } else {
                            let pct = round_half_up(f * 100.0, digits);
                            format!("{:.*}{}", digits as usize, pct, suffix)
                        }
                    })
                    .collect()
            })
            .collect();

        let mut next = self.clone();
        next.formatted = Some(formatted);
        next.advance(AdornState::Formatted)
    }

    /// Show the underlying counts next to the formatted percentages
    pub fn add_ns(&self, style: NsStyle) -> Result<Self> {
        self.expect_state("add_ns", &[AdornState::Formatted])?;
        let mut next = self.clone();
        next.ns = Some(style);
        next.advance(AdornState::Annotated)
    }

    /// Relabel the corner header with the tabulated dimension names
    pub fn add_title(&self, style: TitleStyle) -> Result<Self> {
        self.expect_state(
            "add_title",
            &[AdornState::Raw, AdornState::Totaled, AdornState::Annotated],
        )?;
        let mut next = self.clone();
        match (style, self.dims.get(1)) {
            (TitleStyle::Combined, Some(col_var)) => {
                next.corner = format!("{}/{}", self.dims[0], col_var);
            }
            (TitleStyle::Top, Some(col_var)) => {
                next.spanning_header = Some(col_var.clone());
            }
            // a one-way table has nothing to add to its row variable
            (_, None) => {}
        }
        next.advance(AdornState::Titled)
    }

    fn render(&self) -> Result<Table> {
        let mut labels = self.row_labels.clone();
        if self.total_row {
            labels.push(TOTAL_LABEL.into());
        }
        let mut names = vec![self.corner.clone()];
        let mut columns = vec![labels];

        let mut headers = self.col_labels.clone();
        if self.total_col {
            headers.push(TOTAL_LABEL.to_string());
        }

        for (c, header) in headers.into_iter().enumerate() {
            let counts: Vec<Cell> = self.counts.iter().map(|row| row[c].into()).collect();
            let count_text = |r: usize| Cell::Number(self.counts[r][c]).display().into_owned();

            let cells = match (&self.formatted, &self.fractions) {
                (Some(formatted), _) => (0..self.counts.len())
                    .map(|r| {
                        let pct = &formatted[r][c];
                        let text = match self.ns {
                            Some(NsStyle::Combined) => format!("{} ({})", pct, count_text(r)),
                            Some(NsStyle::CombinedFront) => {
                                format!("{} ({})", count_text(r), pct)
                            }
                            Some(NsStyle::Separate) | None => pct.clone(),
                        };
                        Cell::Text(text)
                    })
                    .collect(),
                (None, Some(fractions)) => fractions.iter().map(|row| row[c].into()).collect(),
                (None, None) => counts.clone(),
            };

            names.push(header.clone());
            columns.push(cells);
            if self.ns == Some(NsStyle::Separate) {
                names.push(format!("{}_n", header));
                columns.push(counts);
            }
        }

        let names = unique_headers(names);
        Table::new(
            names
                .into_iter()
                .zip(columns)
                .map(|(name, cells)| Column::new(name, cells))
                .collect(),
        )
    }
}

/// Level labels may repeat once rendered (the number 1 and the text "1");
/// later copies get a numeric suffix.
fn unique_headers(names: Vec<String>) -> Vec<String> {
    let mut seen = FxHashSet::default();
    names
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut n = 2;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}_{}", name, n);
                n += 1;
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{tabulate, Tabulator};

    fn two_by_two() -> Tabyl {
        Tabyl::new(
            vec!["dept".into(), "outcome".into()],
            None,
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into()],
            vec![vec![3.0, 1.0], vec![2.0, 4.0]],
        )
        .unwrap()
    }

    fn text_column(tabyl: &Tabyl, name: &str) -> Vec<String> {
        tabyl
            .table()
            .column(name)
            .unwrap()
            .cells
            .iter()
            .map(|c| c.display().into_owned())
            .collect()
    }

    #[test]
    fn test_raw_rendering() {
        let tabyl = two_by_two();
        assert_eq!(tabyl.state(), AdornState::Raw);
        assert_eq!(tabyl.table().names(), vec!["dept", "x", "y"]);
        assert_eq!(
            tabyl.table().row(1),
            vec![&Cell::from("b"), &Cell::Number(2.0), &Cell::Number(4.0)]
        );
    }

    #[test]
    fn test_totals_both() {
        let tabyl = two_by_two().add_totals(TotalsAxis::Both).unwrap();
        assert_eq!(tabyl.table().names(), vec!["dept", "x", "y", "Total"]);
        assert_eq!(tabyl.counts()[2], vec![5.0, 5.0, 10.0]);
        assert_eq!(text_column(&tabyl, "Total"), vec!["4", "6", "10"]);
        assert_eq!(text_column(&tabyl, "dept"), vec!["a", "b", "Total"]);
    }

    #[test]
    fn test_row_percentages_formatted() {
        let tabyl = two_by_two()
            .add_totals(TotalsAxis::Row)
            .and_then(|t| t.to_percentages(PercentAxis::Row))
            .and_then(|t| t.format_percentages(1, "%"))
            .unwrap();
        assert_eq!(tabyl.state(), AdornState::Formatted);
        assert_eq!(text_column(&tabyl, "x"), vec!["75.0%", "33.3%", "50.0%"]);
        assert_eq!(text_column(&tabyl, "y"), vec!["25.0%", "66.7%", "50.0%"]);
    }

    #[test]
    fn test_percentages_sum_to_one_along_axis() {
        let totaled = two_by_two().add_totals(TotalsAxis::Both).unwrap();
        let tolerance = 1e-12;

        let by_row = totaled.to_percentages(PercentAxis::Row).unwrap();
        for row in &by_row.fractions().unwrap()[..2] {
            assert!((row[0] + row[1] - 1.0).abs() < tolerance);
            assert!((row[2] - 1.0).abs() < tolerance);
        }

        let by_col = totaled.to_percentages(PercentAxis::Col).unwrap();
        let f = by_col.fractions().unwrap();
        for c in 0..2 {
            assert!((f[0][c] + f[1][c] - 1.0).abs() < tolerance);
            assert!((f[2][c] - 1.0).abs() < tolerance);
        }

        let by_all = totaled.to_percentages(PercentAxis::All).unwrap();
        let f = by_all.fractions().unwrap();
        let data: f64 = f[..2].iter().map(|row| row[0] + row[1]).sum();
        assert!((data - 1.0).abs() < tolerance);
        assert!((f[2][2] - 1.0).abs() < tolerance);
    }

    #[test]
    fn test_zero_denominator_renders_dash() {
        let tabyl = Tabyl::new(
            vec!["g".into(), "h".into()],
            None,
            vec!["a".into(), "b".into()],
            vec!["x".into()],
            vec![vec![0.0], vec![2.0]],
        )
        .unwrap()
        .to_percentages(PercentAxis::Row)
        .and_then(|t| t.format_percentages(0, "%"))
        .unwrap();
        assert_eq!(text_column(&tabyl, "x"), vec!["-", "100%"]);
    }

    #[test]
    fn test_ns_styles() {
        let formatted = two_by_two()
            .to_percentages(PercentAxis::Row)
            .and_then(|t| t.format_percentages(1, "%"))
            .unwrap();

        let combined = formatted.add_ns(NsStyle::Combined).unwrap();
        assert_eq!(text_column(&combined, "x"), vec!["75.0% (3)", "33.3% (2)"]);

        let front = formatted.add_ns(NsStyle::CombinedFront).unwrap();
        assert_eq!(text_column(&front, "y"), vec!["1 (25.0%)", "4 (66.7%)"]);

        let separate = formatted.add_ns(NsStyle::Separate).unwrap();
        assert_eq!(separate.table().names(), vec!["dept", "x", "x_n", "y", "y_n"]);
        assert_eq!(text_column(&separate, "y_n"), vec!["1", "4"]);
    }

    #[test]
    fn test_titles() {
        let combined = two_by_two().add_title(TitleStyle::Combined).unwrap();
        assert_eq!(combined.table().names()[0], "dept/outcome");
        assert_eq!(combined.spanning_header(), None);

        let top = two_by_two()
            .add_totals(TotalsAxis::Col)
            .and_then(|t| t.add_title(TitleStyle::Top))
            .unwrap();
        assert_eq!(top.table().names()[0], "dept");
        assert_eq!(top.spanning_header(), Some("outcome"));
        // data cells are untouched
        assert_eq!(top.counts(), two_by_two().add_totals(TotalsAxis::Col).unwrap().counts());
    }

    #[test]
    fn test_out_of_order_steps_fail() {
        let raw = two_by_two();
        assert_eq!(
            raw.format_percentages(1, "%"),
            Err(TableError::TypeMismatch {
                expected: "proportions",
                found: "counts".into()
            })
        );
        assert_eq!(
            raw.add_ns(NsStyle::Combined),
            Err(TableError::InvalidPipelineState {
                step: "add_ns",
                state: "raw"
            })
        );

        let proportioned = raw.to_percentages(PercentAxis::All).unwrap();
        assert!(matches!(
            proportioned.add_totals(TotalsAxis::Row),
            Err(TableError::InvalidPipelineState { .. })
        ));
        assert!(matches!(
            proportioned.add_title(TitleStyle::Combined),
            Err(TableError::InvalidPipelineState { .. })
        ));

        let titled = raw.add_title(TitleStyle::Top).unwrap();
        assert!(matches!(
            titled.format_percentages(1, "%"),
            Err(TableError::InvalidPipelineState { .. })
        ));
        // the input is never modified
        assert_eq!(raw.state(), AdornState::Raw);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(12.5, 0), 13.0);
        assert_eq!(round_half_up(0.125 * 100.0, 0), 13.0);
        assert_eq!(round_half_up(-2.5, 0), -3.0);
        assert_eq!(round_half_up(66.666, 1), 66.7);
    }

    #[test]
    fn test_repeated_labels_are_made_unique() {
        let tabyl = Tabyl::new(
            vec!["g".into(), "h".into()],
            None,
            vec!["a".into()],
            vec!["1".into(), "1".into()],
            vec![vec![1.0, 2.0]],
        )
        .unwrap();
        assert_eq!(tabyl.table().names(), vec!["g", "1", "1_2"]);
    }

    fn single_column(name: &str, cells: Vec<Cell>) -> Table {
        Table::new(vec![Column::new(name, cells)]).unwrap()
    }

    #[test]
    fn test_totals_on_table_without_rows() {
        let empty = single_column("subject", Vec::new());
        let tabyl = tabulate(&empty, &["subject"], true)
            .and_then(|t| t.to_tabyls())
            .unwrap()
            .remove(0);

        let totaled = tabyl.add_totals(TotalsAxis::Row).unwrap();
        assert_eq!(totaled.counts(), &[vec![0.0]]);
        assert_eq!(
            totaled.table().row(0),
            vec![&Cell::from(TOTAL_LABEL), &Cell::Number(0.0)]
        );

        let formatted = totaled
            .to_percentages(PercentAxis::All)
            .and_then(|t| t.format_percentages(1, "%"))
            .unwrap();
        assert_eq!(text_column(&formatted, "n"), vec!["-"]);
    }

    #[test]
    fn test_declared_column_levels_without_rows() {
        let empty = Table::new(vec![
            Column::new("g", Vec::new()),
            Column::new("h", Vec::new()),
        ])
        .unwrap();
        let tabyl = Tabulator::new(&["g", "h"])
            .with_levels("h", vec!["x".into(), "y".into()])
            .tabulate(&empty)
            .and_then(|t| t.to_tabyls())
            .unwrap()
            .remove(0);

        let totaled = tabyl.add_totals(TotalsAxis::Both).unwrap();
        assert_eq!(totaled.table().names(), vec!["g", "x", "y", "Total"]);
        assert_eq!(totaled.counts(), &[vec![0.0, 0.0, 0.0]]);
        assert!(totaled.to_percentages(PercentAxis::Col).is_ok());
    }

    #[test]
    fn test_single_level() {
        let table = single_column("g", vec!["a".into(), "a".into()]);
        let tabyl = tabulate(&table, &["g"], true)
            .and_then(|t| t.to_tabyls())
            .unwrap()
            .remove(0)
            .add_totals(TotalsAxis::Both)
            .and_then(|t| t.to_percentages(PercentAxis::Row))
            .and_then(|t| t.format_percentages(0, "%"))
            .and_then(|t| t.add_ns(NsStyle::Combined))
            .and_then(|t| t.add_title(TitleStyle::Top))
            .unwrap();
        assert_eq!(text_column(&tabyl, "n"), vec!["100% (2)", "100% (2)"]);
        assert_eq!(text_column(&tabyl, "Total"), vec!["100% (2)", "100% (2)"]);
    }

    #[test]
    fn test_every_level_dropped() {
        let table = single_column("g", vec![Cell::Null, Cell::Null]);
        let tabyl = Tabulator::new(&["g"])
            .with_levels("g", vec!["x".into(), "y".into()])
            .show_na(false)
            .show_missing_levels(false)
            .tabulate(&table)
            .and_then(|t| t.to_tabyls())
            .unwrap()
            .remove(0);
        assert_eq!(tabyl.table().row_count(), 0);

        let totaled = tabyl.add_totals(TotalsAxis::Both).unwrap();
        assert_eq!(totaled.counts(), &[vec![0.0, 0.0]]);
        assert!(totaled
            .to_percentages(PercentAxis::Row)
            .and_then(|t| t.format_percentages(1, "%"))
            .is_ok());
    }
}
