//! Error taxonomy shared by every primitive

use thiserror::Error;

/// Failure of a table primitive. Every operation either succeeds completely
/// or returns one of these without partial output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("{step} is not allowed on a {state} table")]
    InvalidPipelineState {
        step: &'static str,
        state: &'static str,
    },

    #[error("nothing to operate on: {0}")]
    Empty(&'static str),
}

pub type Result<T> = std::result::Result<T, TableError>;
