//! Typed key tuples for selecting reference-table rows.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{ColumnHandle, TableStore};

/// One typed key value.
///
/// Equality is exact: strings compare case-sensitively, integers
/// exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Text(s) => write!(f, "{}", s),
            KeyValue::Int(i) => write!(f, "{}", i),
        }
    }
}

/// A short fixed tuple of (column, value) pairs that a row must equal
/// to qualify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionKey {
    fields: Vec<(String, KeyValue)>,
}

impl SelectionKey {
    /// Create an empty key.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a string-valued key field.
    pub fn text(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((column.into(), KeyValue::Text(value.into())));
        self
    }

    /// Add an integer-valued key field.
    pub fn int(mut self, column: impl Into<String>, value: i64) -> Self {
        self.fields.push((column.into(), KeyValue::Int(value)));
        self
    }

    /// Resolve every key column against an open table.
    ///
    /// Absence of a key column is fatal; this runs once, before any
    /// row is scanned.
    pub fn resolve<T: TableStore>(&self, store: &T) -> Result<ResolvedKey<'_>> {
        let mut fields = Vec::with_capacity(self.fields.len());
        for (column, value) in &self.fields {
            let handle = store.require_column(column)?;
            fields.push((handle, value));
        }
        Ok(ResolvedKey { fields })
    }

    /// Render the key for diagnostics, e.g. `OPT_ELEM G140L, CENWAVE 1425`.
    pub fn describe(&self) -> String {
        self.fields
            .iter()
            .map(|(column, value)| format!("{} {}", column, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for SelectionKey {
    fn default() -> Self {
        Self::new()
    }
}

/// A key with its columns resolved to handles, ready for row tests.
#[derive(Debug)]
pub struct ResolvedKey<'a> {
    fields: Vec<(ColumnHandle, &'a KeyValue)>,
}

impl ResolvedKey<'_> {
    /// Test whether `row` matches every key field exactly.
    ///
    /// A failed read aborts the whole scan, so errors propagate.
    pub fn matches<T: TableStore>(&self, store: &T, row: usize) -> Result<bool> {
        for &(handle, value) in &self.fields {
            let hit = match value {
                KeyValue::Text(want) => store.read_text(handle, row)?.as_str() == want.as_str(),
                KeyValue::Int(want) => store.read_int(handle, row)? == *want,
            };
            if !hit {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
