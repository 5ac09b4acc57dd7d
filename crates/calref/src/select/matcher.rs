//! Ordered row scan with pedigree gating.
//!
//! The scan visits rows 1..=row_count in table storage order; no index
//! or sort order is assumed. What a disqualified (dummy-pedigree) row
//! does to the scan differs between call sites, so it is an explicit
//! policy here rather than duplicated loop logic.

use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::table::TableStore;

use super::key::SelectionKey;
use super::pedigree::{Pedigree, PedigreeColumns};

/// How many qualifying rows the caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Keep scanning after a match; several rows may share the key.
    CollectAll,
    /// Stop at the first qualifying match.
    FirstMatch,
}

/// What a dummy-pedigree row does to the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisqualifiedPolicy {
    /// Skip the row and keep scanning.
    SkipRow,
    /// Abort the scan; the caller takes its fallback path.
    StopWithFallback,
}

/// Outcome of one scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// 1-based rows that matched the key and passed the pedigree gate,
    /// in scan order.
    pub matches: Vec<usize>,
    /// Rows that matched the key but were disqualified.
    pub disqualified: Vec<usize>,
    /// Set when `StopWithFallback` ended the scan early, to the row
    /// that triggered it.
    pub stopped_on_dummy: Option<usize>,
    /// Warnings accumulated during the scan.
    pub diagnostics: Vec<Diagnostic>,
}

/// Scan a table for rows matching `key`, gating each match on its
/// pedigree.
///
/// Key columns are resolved up front; their absence fails before any
/// row is read. A storage-layer failure while reading a key or
/// pedigree field aborts the scan immediately.
pub fn scan<T: TableStore>(
    store: &T,
    key: &SelectionKey,
    pedigree: &PedigreeColumns,
    mode: ScanMode,
    policy: DisqualifiedPolicy,
) -> Result<ScanOutcome> {
    let resolved = key.resolve(store)?;

    let mut outcome = ScanOutcome {
        matches: Vec::new(),
        disqualified: Vec::new(),
        stopped_on_dummy: None,
        diagnostics: Vec::new(),
    };

    for row in 1..=store.row_count() {
        if !resolved.matches(store, row)? {
            continue;
        }

        let record = pedigree.classify(store, row)?;
        if record.pedigree == Pedigree::Dummy {
            outcome.disqualified.push(row);
            outcome.diagnostics.push(Diagnostic::row_warning(
                store.name(),
                row,
                format!("DUMMY pedigree in row {} of {}", row, store.name()),
            ));
            match policy {
                DisqualifiedPolicy::SkipRow => continue,
                DisqualifiedPolicy::StopWithFallback => {
                    outcome.stopped_on_dummy = Some(row);
                    break;
                }
            }
        }

        outcome.matches.push(row);
        if mode == ScanMode::FirstMatch {
            break;
        }
    }

    Ok(outcome)
}
