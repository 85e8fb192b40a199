//! Data model for tabular data representation

mod cell;
mod table;

pub use cell::Cell;
pub use table::{Column, Table};
