//! The two lookup operations built on the selection engine.

mod pcorr;
mod trace;

use serde::{Deserialize, Serialize};

pub use pcorr::{
    CorrectionCurve, CorrectionStatus, FallbackReason, PhotCorrKey, PhotCorrLookup,
    MAX_CURVE_SAMPLES,
};
pub use trace::{TraceKey, TraceList, TraceLookup, TraceRecord, TraceSet, MAX_TRACE_POINTS};

/// Administrative state of a calibration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalSwitch {
    /// The step runs against its reference table.
    Perform,
    /// The step is disabled; lookups take their neutral fallback.
    Omit,
}
