//! Tagged cell values

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::Serialize;

/// A single value within a column
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Boolean(a), Cell::Boolean(b)) => a == b,
            (Cell::Number(a), Cell::Number(b)) => {
                // NaN groups with NaN
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Date(a), Cell::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Boolean(b) => b.hash(state),
            Cell::Number(f) => canonical_bits(*f).hash(state),
            Cell::Text(s) => s.hash(state),
            Cell::Date(d) => d.hash(state),
        }
    }
}

/// Bits that agree with `PartialEq`: `-0.0 == 0.0` and every NaN is equal.
fn canonical_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

impl Cell {
    /// Rank of the variant when values of different types share a column.
    /// Null always sorts last.
    fn type_rank(&self) -> u8 {
        match self {
            Cell::Boolean(_) => 0,
            Cell::Number(_) => 1,
            Cell::Date(_) => 2,
            Cell::Text(_) => 3,
            Cell::Null => 4,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Null or empty text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Boolean(_) => "boolean",
            Cell::Number(_) => "number",
            Cell::Text(_) => "text",
            Cell::Date(_) => "date",
        }
    }

    /// Convert to a display string. Null renders as `NA`.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Cell::Null => Cow::Borrowed("NA"),
            Cell::Boolean(b) => Cow::Owned(b.to_string()),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Date(d) => Cow::Owned(d.to_string()),
        }
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Natural level order: booleans, numbers ascending, dates chronologically,
/// text lexicographically, then Null.
impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cell::Boolean(a), Cell::Boolean(b)) => a.cmp(b),
            (Cell::Number(a), Cell::Number(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            },
            (Cell::Date(a), Cell::Date(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Number(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Number(i as f64)
    }
}

impl From<i32> for Cell {
    fn from(i: i32) -> Self {
        Cell::Number(f64::from(i))
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Boolean(b)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

impl<T> From<Option<T>> for Cell
where
    T: Into<Cell>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Cell::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHasher;

    fn hash_of(cell: &Cell) -> u64 {
        let mut hasher = FxHasher::default();
        cell.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_zero_and_nan_hash_consistently() {
        assert_eq!(Cell::Number(0.0), Cell::Number(-0.0));
        assert_eq!(hash_of(&Cell::Number(0.0)), hash_of(&Cell::Number(-0.0)));
        assert_eq!(Cell::Number(f64::NAN), Cell::Number(-f64::NAN));
        assert_eq!(
            hash_of(&Cell::Number(f64::NAN)),
            hash_of(&Cell::Number(-f64::NAN))
        );
    }

    #[test]
    fn test_level_order() {
        let mut cells = vec![
            Cell::Null,
            Cell::from("b"),
            Cell::Number(10.0),
            Cell::from("a"),
            Cell::Number(2.0),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                Cell::Number(2.0),
                Cell::Number(10.0),
                Cell::from("a"),
                Cell::from("b"),
                Cell::Null,
            ]
        );
    }

    #[test]
    fn test_blank() {
        assert!(Cell::Null.is_blank());
        assert!(Cell::from("").is_blank());
        assert!(!Cell::from(" ").is_blank());
        assert!(!Cell::Number(0.0).is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::Number(6.0).display(), "6");
        assert_eq!(Cell::Number(2.5).display(), "2.5");
        assert_eq!(Cell::Null.display(), "NA");
        let d = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        assert_eq!(Cell::Date(d).display(), "2021-01-01");
    }
}
