//! Read-only reference-table access.
//!
//! The lookup engine only ever sees the [`TableStore`] trait; the
//! TSV-backed [`RefTable`] is the implementation shipped with the
//! crate. Row numbering is 1-based throughout, matching the table's
//! own convention.

mod reader;
mod store;

pub use reader::{ReaderConfig, RefTable, TableMetadata};
pub use store::{ColumnHandle, TableStore};
