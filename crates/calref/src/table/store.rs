//! The storage seam consumed by the lookup engine.

use serde::{Deserialize, Serialize};

use crate::error::{CalrefError, Result};

/// Opaque handle to one column of an open table.
///
/// Resolved once per table via [`TableStore::find_column`] and reused
/// across row reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnHandle(pub(crate) usize);

impl ColumnHandle {
    /// Zero-based position of the column in the table.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Read-only access to an open reference table.
///
/// Every fallible read returns a `Result` directly; there is no
/// out-of-band error flag to poll. Rows are numbered from 1.
pub trait TableStore {
    /// Name of the table, for diagnostics.
    fn name(&self) -> &str;

    /// Number of data rows.
    fn row_count(&self) -> usize;

    /// Find a column by name, case-insensitively.
    ///
    /// ASCII case is folded before comparison; the first match in
    /// table-defined column order wins. Returns `None` when no column
    /// carries the name — callers decide whether absence is fatal.
    fn find_column(&self, name: &str) -> Option<ColumnHandle>;

    /// Read an integer-valued header keyword.
    fn header_int(&self, keyword: &str) -> Result<i64>;

    /// Read a text cell.
    fn read_text(&self, column: ColumnHandle, row: usize) -> Result<String>;

    /// Read an integer cell.
    fn read_int(&self, column: ColumnHandle, row: usize) -> Result<i64>;

    /// Read a floating-point cell.
    fn read_double(&self, column: ColumnHandle, row: usize) -> Result<f64>;

    /// Read up to `count` elements of an array cell, starting at
    /// element 1. Returns the values actually present, which may be
    /// fewer than `count`; validating the count is the caller's job.
    fn read_array(&self, column: ColumnHandle, row: usize, count: usize) -> Result<Vec<f64>>;

    /// Find a column that must exist, failing with
    /// [`CalrefError::ColumnNotFound`] otherwise.
    fn require_column(&self, name: &str) -> Result<ColumnHandle> {
        self.find_column(name)
            .ok_or_else(|| CalrefError::ColumnNotFound {
                table: self.name().to_string(),
                column: name.to_string(),
            })
    }
}
