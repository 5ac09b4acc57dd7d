//! Photometric-correction lookup (first-match with unity fallback).
//!
//! The correction table maps (aperture, central wavelength, extraction
//! height) to a coarse curve of multiplicative factors correcting flux
//! from the default extraction box to an "infinite" one. The row with
//! EXTRHEIGHT equal to the MAXHGHT header keyword is the infinite-
//! aperture row; its curve is spline-resampled onto the observation's
//! wavelength grid.
//!
//! A disabled switch, a missing row, or a dummy first match all yield
//! the neutral correction (1.0 everywhere) with a diagnostic instead
//! of failing the pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostic, Severity};
use crate::error::Result;
use crate::resample::CubicSpline;
use crate::select::{extract_array, scan, DisqualifiedPolicy, PedigreeColumns, ScanMode, SelectionKey};
use crate::table::{RefTable, TableMetadata, TableStore};

use super::CalSwitch;

/// Hard cap on the length of one coarse reference curve.
pub const MAX_CURVE_SAMPLES: usize = 4096;

/// Key selecting correction rows; the extraction height comes from the
/// table's own MAXHGHT header keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotCorrKey {
    /// Aperture name.
    pub aperture: String,
    /// Central wavelength.
    pub cenwave: i64,
}

impl PhotCorrKey {
    pub fn new(aperture: impl Into<String>, cenwave: i64) -> Self {
        Self {
            aperture: aperture.into(),
            cenwave,
        }
    }

    fn selection(&self, maxhght: i64) -> SelectionKey {
        SelectionKey::new()
            .text("APERTURE", self.aperture.clone())
            .int("CENWAVE", self.cenwave)
            .int("EXTRHEIGHT", maxhght)
    }
}

/// Why a lookup fell back to the neutral correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The calibration switch was not `Perform`.
    Omitted,
    /// No row matched the key.
    NoMatch,
    /// The first matching row had DUMMY pedigree.
    DummyPedigree { row: usize },
}

/// How the correction factors were produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CorrectionStatus {
    /// Interpolated from the given table row.
    Interpolated { row: usize },
    /// Every factor is 1.0; no correction applied.
    UnityFallback {
        #[serde(flatten)]
        reason: FallbackReason,
    },
}

/// A correction factor per element of the caller's wavelength grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionCurve {
    /// One factor per target wavelength, aligned 1:1 with the grid.
    pub factors: Vec<f64>,
    pub status: CorrectionStatus,
    pub diagnostics: Vec<Diagnostic>,
    /// Provenance of the table, when one was opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<TableMetadata>,
}

impl CorrectionCurve {
    fn unity(
        len: usize,
        reason: FallbackReason,
        diagnostics: Vec<Diagnostic>,
        source: Option<TableMetadata>,
    ) -> Self {
        Self {
            factors: vec![1.0; len],
            status: CorrectionStatus::UnityFallback { reason },
            diagnostics,
            source,
        }
    }

    /// Whether the neutral fallback was taken.
    pub fn is_fallback(&self) -> bool {
        matches!(self.status, CorrectionStatus::UnityFallback { .. })
    }
}

/// First-match lookup of the aperture-size correction curve.
#[derive(Debug, Clone)]
pub struct PhotCorrLookup {
    key: PhotCorrKey,
    switch: CalSwitch,
}

impl PhotCorrLookup {
    /// Create a lookup for the given key, with the step enabled.
    pub fn new(key: PhotCorrKey) -> Self {
        Self {
            key,
            switch: CalSwitch::Perform,
        }
    }

    /// Set the administrative switch for this step.
    pub fn with_switch(mut self, switch: CalSwitch) -> Self {
        self.switch = switch;
        self
    }

    /// Produce one correction factor per element of `grid`.
    ///
    /// Only storage-layer failures are errors; every "no usable row"
    /// path returns the unity curve with a diagnostic.
    pub fn fetch(&self, path: impl AsRef<Path>, grid: &[f64]) -> Result<CorrectionCurve> {
        if self.switch != CalSwitch::Perform {
            let diag = Diagnostic {
                severity: Severity::Info,
                table: path.as_ref().display().to_string(),
                row: None,
                message: "correction step omitted; applying neutral correction".to_string(),
            };
            return Ok(CorrectionCurve::unity(
                grid.len(),
                FallbackReason::Omitted,
                vec![diag],
                None,
            ));
        }

        let table = RefTable::open(path)?;
        let metadata = table.metadata().clone();
        self.fetch_from(&table, grid)
            .map(|mut curve| {
                curve.source = Some(metadata);
                curve
            })
    }

    /// Run the lookup against an already-open store.
    pub fn fetch_from<T: TableStore>(&self, store: &T, grid: &[f64]) -> Result<CorrectionCurve> {
        let maxhght = store.header_int("MAXHGHT")?;
        let cp_nelem = store.require_column("NELEM")?;
        let cp_wl = store.require_column("WAVELENGTH")?;
        let cp_thru = store.require_column("THROUGHPUT")?;
        let pedigree = PedigreeColumns::resolve(store);

        let selection = self.key.selection(maxhght);
        let mut outcome = scan(
            store,
            &selection,
            &pedigree,
            ScanMode::FirstMatch,
            DisqualifiedPolicy::StopWithFallback,
        )?;

        if let Some(row) = outcome.stopped_on_dummy {
            return Ok(CorrectionCurve::unity(
                grid.len(),
                FallbackReason::DummyPedigree { row },
                outcome.diagnostics,
                None,
            ));
        }

        let row = match outcome.matches.first() {
            Some(&row) => row,
            None => {
                outcome.diagnostics.push(Diagnostic::table_warning(
                    store.name(),
                    format!(
                        "matching row not found in {}; {}",
                        store.name(),
                        selection.describe()
                    ),
                ));
                return Ok(CorrectionCurve::unity(
                    grid.len(),
                    FallbackReason::NoMatch,
                    outcome.diagnostics,
                    None,
                ));
            }
        };

        // Both arrays carry the same declared count.
        let wavelengths = extract_array(store, row, cp_nelem, cp_wl, MAX_CURVE_SAMPLES)?;
        let throughputs = extract_array(store, row, cp_nelem, cp_thru, MAX_CURVE_SAMPLES)?;

        let spline = CubicSpline::natural(&wavelengths, &throughputs)?;
        Ok(CorrectionCurve {
            factors: spline.resample(grid),
            status: CorrectionStatus::Interpolated { row },
            diagnostics: outcome.diagnostics,
            source: None,
        })
    }
}
