//! Operator-facing diagnostics emitted by lookup operations.
//!
//! Disqualified rows and fallback paths are not errors, but operators
//! need to know which reference file and row were implicated. Lookups
//! collect these as structured values on their results; callers decide
//! whether to print them.

use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only, may not require action.
    Info,
    /// Reference data was skipped or substituted; results may differ.
    Warning,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
        }
    }
}

/// One diagnostic message tied to a reference table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the condition.
    pub severity: Severity,
    /// Name of the reference table implicated.
    pub table: String,
    /// 1-based row number, when the condition concerns one row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// A warning about a specific row of a table.
    pub fn row_warning(table: impl Into<String>, row: usize, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            table: table.into(),
            row: Some(row),
            message: message.into(),
        }
    }

    /// A warning about the table as a whole.
    pub fn table_warning(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            table: table.into(),
            row: None,
            message: message.into(),
        }
    }
}
