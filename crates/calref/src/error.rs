//! Error types for the calref library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for calref operations.
#[derive(Debug, Error)]
pub enum CalrefError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library while parsing a table body.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reference table missing or unreadable.
    #[error("reference table '{path}' could not be opened: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// A required column is absent from the table.
    #[error("column {column} not found in {table}")]
    ColumnNotFound { table: String, column: String },

    /// I/O error, short read, or unparsable cell during a row scan.
    #[error("table error in {table} row {row}: {message}")]
    Table {
        table: String,
        row: usize,
        message: String,
    },

    /// Declared array size exceeds the hard buffer limit.
    #[error("declared array size {declared} exceeds capacity {capacity} in {table} row {row}")]
    CapacityExceeded {
        table: String,
        row: usize,
        declared: usize,
        capacity: usize,
    },

    /// Fewer than two reference samples for spline interpolation.
    #[error("insufficient data for interpolation: {got} reference samples, need at least 2")]
    InsufficientData { got: usize },

    /// No row in the table qualified for the given key.
    #[error("no matching row found in {table}; {key}")]
    NoMatch { table: String, key: String },

    /// Malformed table structure (bad header line, ragged row, etc.).
    #[error("parse error in '{path}' line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Result type alias for calref operations.
pub type Result<T> = std::result::Result<T, CalrefError>;
