//! Cleaning primitives: names, empty structures, dates, coalescing

mod coalesce;
pub mod excel_date;
mod headers;
mod names;
mod prune;

pub use coalesce::{coalesce, coalesce_columns};
pub use excel_date::convert_excel_dates;
pub use headers::row_to_names;
pub use names::{clean_name, clean_names, normalize_names};
pub use prune::{remove_constant, remove_empty};
