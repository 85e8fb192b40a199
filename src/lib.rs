//! tabclean - Cleaning and cross-tabulation for tabular data
//!
//! Normalizes messy headers, prunes empty structure, decodes spreadsheet
//! date serials, coalesces columns, finds duplicate rows and builds
//! adorned one- to three-way count tables. The `model`, `clean` and
//! `inspect` modules never touch the filesystem; `parser` and `output`
//! adapt files and renderers around them.

pub mod clean;
pub mod config;
pub mod error;
pub mod inspect;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use config::Config;
pub use error::{Result, TableError};
pub use inspect::{Tabulation, Tabyl};
pub use model::{Cell, Column, Table};
