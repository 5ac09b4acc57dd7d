//! Row selection: key matching, provenance gating, array extraction.

mod extract;
mod key;
mod matcher;
mod pedigree;

pub use extract::extract_array;
pub use key::{KeyValue, ResolvedKey, SelectionKey};
pub use matcher::{scan, DisqualifiedPolicy, ScanMode, ScanOutcome};
pub use pedigree::{Pedigree, PedigreeColumns, PedigreeRecord};
