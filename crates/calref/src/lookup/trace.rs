//! Spectral-trace lookup (collect-all).
//!
//! A spectrum trace table holds one row per (grating, central
//! wavelength, spectral order): the spatial displacement of the
//! spectrum at each detector column. All rows matching the observation
//! key are collected; several rows usually share the key and differ
//! only in SPORDER.
//!
//! Required columns: OPT_ELEM, CENWAVE, SPORDER, A1CENTER, A2CENTER,
//! NELEM, A2DISPL. Optional: PEDIGREE, DESCRIP, MJD, DEGPERYR (the
//! last two drive time-dependent trace rotation).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Severity};
use crate::error::{CalrefError, Result};
use crate::select::{extract_array, scan, DisqualifiedPolicy, PedigreeColumns, ScanMode, SelectionKey};
use crate::table::{RefTable, TableMetadata, TableStore};

/// Hard cap on the length of one displacement array.
pub const MAX_TRACE_POINTS: usize = 1024;

/// Days per Julian year, for the rotation rate.
const DAYS_PER_YEAR: f64 = 365.25;

/// Key selecting trace rows: grating (or mirror) name and central
/// wavelength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceKey {
    /// Optical element name.
    pub opt_elem: String,
    /// Central wavelength.
    pub cenwave: i64,
}

impl TraceKey {
    pub fn new(opt_elem: impl Into<String>, cenwave: i64) -> Self {
        Self {
            opt_elem: opt_elem.into(),
            cenwave,
        }
    }

    fn selection(&self) -> SelectionKey {
        SelectionKey::new()
            .text("OPT_ELEM", self.opt_elem.clone())
            .int("CENWAVE", self.cenwave)
    }
}

/// One spectral trace, extracted from one table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Spectral order number (SPORDER).
    pub order: i64,
    /// X location on the detector, converted to 0-indexed.
    pub a1_center: f64,
    /// Y location on the detector, converted to 0-indexed.
    pub a2_center: f64,
    /// Displacement at each detector column, rotation already applied.
    pub displacements: Vec<f64>,
}

/// Traces plus scan diagnostics, without source metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceList {
    /// Qualifying traces in table scan order.
    pub records: Vec<TraceRecord>,
    /// Rotation angle applied, in degrees, when the table carries
    /// rotation columns and an exposure start was supplied.
    pub rotation: Option<f64>,
    /// Warnings from the scan (disqualified rows, skipped rotation).
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a trace lookup against a reference file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSet {
    pub records: Vec<TraceRecord>,
    pub rotation: Option<f64>,
    pub diagnostics: Vec<Diagnostic>,
    /// Provenance of the table the traces came from.
    pub source: TableMetadata,
}

/// Collect-all lookup of spectral traces.
#[derive(Debug, Clone)]
pub struct TraceLookup {
    key: TraceKey,
    expstart: Option<f64>,
}

impl TraceLookup {
    /// Create a lookup for the given key.
    pub fn new(key: TraceKey) -> Self {
        Self {
            key,
            expstart: None,
        }
    }

    /// Supply the exposure start time (MJD) so time-dependent trace
    /// rotation can be applied when the table provides a rate.
    pub fn with_expstart(mut self, mjd: f64) -> Self {
        self.expstart = Some(mjd);
        self
    }

    /// Open the trace table at `path` and collect every qualifying row.
    ///
    /// The table is released on every path out of this call. Zero
    /// qualifying rows is a [`CalrefError::NoMatch`] error; the caller
    /// receives no partial list.
    pub fn fetch(&self, path: impl AsRef<Path>) -> Result<TraceSet> {
        let table = RefTable::open(path)?;
        let list = self.fetch_from(&table)?;
        Ok(TraceSet {
            records: list.records,
            rotation: list.rotation,
            diagnostics: list.diagnostics,
            source: table.metadata().clone(),
        })
    }

    /// Run the lookup against an already-open store.
    pub fn fetch_from<T: TableStore>(&self, store: &T) -> Result<TraceList> {
        // Resolve required columns up front; absence aborts before the
        // scan.
        let cp_sporder = store.require_column("SPORDER")?;
        let cp_a1center = store.require_column("A1CENTER")?;
        let cp_a2center = store.require_column("A2CENTER")?;
        let cp_nelem = store.require_column("NELEM")?;
        let cp_a2displ = store.require_column("A2DISPL")?;

        let pedigree = PedigreeColumns::resolve(store);
        let cp_mjd = store.find_column("MJD");
        let cp_degperyr = store.find_column("DEGPERYR");

        let selection = self.key.selection();
        let mut outcome = scan(
            store,
            &selection,
            &pedigree,
            ScanMode::CollectAll,
            DisqualifiedPolicy::SkipRow,
        )?;

        let mut records = Vec::with_capacity(outcome.matches.len());
        let mut rotation = None;
        let mut rotation_skipped = false;

        for &row in &outcome.matches {
            let order = store.read_int(cp_sporder, row)?;
            // Centers are stored 1-indexed in the table.
            let a1_center = store.read_double(cp_a1center, row)? - 1.0;
            let a2_center = store.read_double(cp_a2center, row)? - 1.0;
            let mut displacements =
                extract_array(store, row, cp_nelem, cp_a2displ, MAX_TRACE_POINTS)?;

            if let (Some(cp_mjd), Some(cp_degperyr)) = (cp_mjd, cp_degperyr) {
                match self.expstart {
                    Some(expstart) => {
                        let mjd = store.read_double(cp_mjd, row)?;
                        let degperyr = store.read_double(cp_degperyr, row)?;
                        let angle = degperyr * (expstart - mjd) / DAYS_PER_YEAR;
                        rotate_trace(&mut displacements, angle);
                        rotation = Some(angle);
                    }
                    None => rotation_skipped = true,
                }
            }

            records.push(TraceRecord {
                order,
                a1_center,
                a2_center,
                displacements,
            });
        }

        if rotation_skipped {
            outcome.diagnostics.push(Diagnostic {
                severity: Severity::Info,
                table: store.name().to_string(),
                row: None,
                message: "table has rotation columns but no exposure start was supplied; \
                          traces not rotated"
                    .to_string(),
            });
        }

        if records.is_empty() {
            let mut key = selection.describe();
            if !outcome.disqualified.is_empty() {
                key.push_str(&format!(
                    " ({} matching rows disqualified by DUMMY pedigree)",
                    outcome.disqualified.len()
                ));
            }
            return Err(CalrefError::NoMatch {
                table: store.name().to_string(),
                key,
            });
        }

        Ok(TraceList {
            records,
            rotation,
            diagnostics: outcome.diagnostics,
        })
    }
}

/// Rotate a trace in place: a shear about the array midpoint by the
/// given angle in degrees.
fn rotate_trace(displ: &mut [f64], angle_deg: f64) {
    if displ.is_empty() {
        return;
    }
    let slope = angle_deg.to_radians().tan();
    let center = (displ.len() - 1) as f64 / 2.0;
    for (i, d) in displ.iter_mut().enumerate() {
        *d += slope * (i as f64 - center);
    }
}
