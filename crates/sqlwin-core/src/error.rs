//! Error types for sqlwin-core

use thiserror::Error;

/// Core error types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Table {table}: row {row} has {actual} values, expected {expected}")]
    ShapeMismatch {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Table {0} has no columns")]
    NoColumns(String),

    #[error("Duplicate table name: {0}")]
    DuplicateTable(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
