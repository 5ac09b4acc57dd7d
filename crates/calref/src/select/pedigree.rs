//! Provenance gating over the optional PEDIGREE/DESCRIP columns.
//!
//! A row whose pedigree begins with `DUMMY` holds placeholder data and
//! must never contribute to a calibration result.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{ColumnHandle, TableStore};

/// Pedigree classification of one table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pedigree {
    /// Usable reference data.
    Good,
    /// Placeholder data; the row is disqualified.
    Dummy,
    /// The table has no PEDIGREE column; treated as good.
    Absent,
}

impl Pedigree {
    /// Whether a row with this pedigree may be used.
    pub fn is_usable(&self) -> bool {
        !matches!(self, Pedigree::Dummy)
    }
}

/// Pedigree value plus the optional DESCRIP text for one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedigreeRecord {
    pub pedigree: Pedigree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descrip: Option<String>,
}

/// Handles for the optional provenance columns, resolved once per table.
#[derive(Debug, Clone, Copy)]
pub struct PedigreeColumns {
    pedigree: Option<ColumnHandle>,
    descrip: Option<ColumnHandle>,
}

impl PedigreeColumns {
    /// Look up the PEDIGREE and DESCRIP columns; absence is tolerated.
    pub fn resolve<T: TableStore>(store: &T) -> Self {
        Self {
            pedigree: store.find_column("PEDIGREE"),
            descrip: store.find_column("DESCRIP"),
        }
    }

    /// Classify the pedigree of one row.
    pub fn classify<T: TableStore>(&self, store: &T, row: usize) -> Result<PedigreeRecord> {
        let pedigree = match self.pedigree {
            None => Pedigree::Absent,
            Some(col) => {
                let value = store.read_text(col, row)?;
                if value.to_ascii_uppercase().starts_with("DUMMY") {
                    Pedigree::Dummy
                } else {
                    Pedigree::Good
                }
            }
        };
        let descrip = match self.descrip {
            None => None,
            Some(col) => {
                let text = store.read_text(col, row)?;
                (!text.is_empty()).then_some(text)
            }
        };
        Ok(PedigreeRecord { pedigree, descrip })
    }
}
