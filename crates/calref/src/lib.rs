//! calref: reference-table lookup and curve resampling for instrument
//! calibration pipelines.
//!
//! Calibration parameters (spectral traces, photometric correction
//! curves) live in external reference tables keyed by the physical
//! setup of an observation. calref finds the matching row(s), gates
//! them on provenance, reads their variable-length arrays, and — for
//! coarse curves — resamples them onto the observation's own
//! wavelength grid with a natural cubic spline.
//!
//! # Core principles
//!
//! - **Read-only, single pass**: a lookup opens its table, scans it
//!   once, and releases it on every path out.
//! - **Provenance-gated**: rows flagged with DUMMY pedigree never
//!   contribute to a result.
//! - **Neutral fallback over failure**: a missing correction row
//!   yields a unity curve and a diagnostic, not a pipeline abort.
//!
//! # Example
//!
//! ```no_run
//! use calref::{TraceKey, TraceLookup};
//!
//! let lookup = TraceLookup::new(TraceKey::new("G140L", 1425));
//! let traces = lookup.fetch("sptrctab.tsv").unwrap();
//!
//! println!("orders found: {}", traces.records.len());
//! for warning in &traces.diagnostics {
//!     eprintln!("{}: {}", warning.severity.label(), warning.message);
//! }
//! ```

pub mod diagnostics;
pub mod error;
pub mod lookup;
pub mod resample;
pub mod select;
pub mod table;

pub use diagnostics::{Diagnostic, Severity};
pub use error::{CalrefError, Result};
pub use lookup::{
    CalSwitch, CorrectionCurve, CorrectionStatus, FallbackReason, PhotCorrKey, PhotCorrLookup,
    TraceKey, TraceLookup, TraceRecord, TraceSet, MAX_CURVE_SAMPLES, MAX_TRACE_POINTS,
};
pub use resample::{resample, CubicSpline};
pub use select::{Pedigree, SelectionKey};
pub use table::{ColumnHandle, ReaderConfig, RefTable, TableMetadata, TableStore};
