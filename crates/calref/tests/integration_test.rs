//! Integration tests for calref lookups against real table files.

use std::io::Write;

use tempfile::NamedTempFile;

use calref::{
    CalSwitch, CalrefError, CorrectionStatus, FallbackReason, PhotCorrKey, PhotCorrLookup,
    RefTable, TableStore, TraceKey, TraceLookup,
};

/// Helper to write a reference table to a temporary file.
fn write_table(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

const TRACE_HEADER: &str = "OPT_ELEM\tCENWAVE\tSPORDER\tA1CENTER\tA2CENTER\tNELEM\tA2DISPL";

// =============================================================================
// Spectral-trace lookup (collect-all)
// =============================================================================

#[test]
fn test_trace_collects_all_matching_orders() {
    let content = format!(
        "{}\n\
         A\t100\t1\t101.0\t201.0\t3\t0.1,0.2,0.3\n\
         A\t100\t2\t102.0\t202.0\t3\t0.4,0.5,0.6\n\
         B\t100\t1\t103.0\t203.0\t3\t0.7,0.8,0.9\n",
        TRACE_HEADER
    );
    let file = write_table(&content);

    let set = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .expect("Lookup failed");

    assert_eq!(set.records.len(), 2);
    let orders: Vec<i64> = set.records.iter().map(|r| r.order).collect();
    assert!(orders.contains(&1));
    assert!(orders.contains(&2));
    assert!(set.diagnostics.is_empty());
}

#[test]
fn test_trace_centers_converted_to_zero_indexed() {
    let content = format!("{}\nG140L\t1425\t1\t100.5\t512.0\t2\t0.0,0.0\n", TRACE_HEADER);
    let file = write_table(&content);

    let set = TraceLookup::new(TraceKey::new("G140L", 1425))
        .fetch(file.path())
        .unwrap();

    assert_eq!(set.records[0].a1_center, 99.5);
    assert_eq!(set.records[0].a2_center, 511.0);
}

#[test]
fn test_trace_dummy_row_excluded_with_warning() {
    let content = format!(
        "{}\tPEDIGREE\n\
         A\t100\t1\t1.0\t1.0\t2\t0.1,0.2\tDUMMY 2001-01-01\n\
         A\t100\t2\t1.0\t1.0\t2\t0.3,0.4\tGROUND\n",
        TRACE_HEADER
    );
    let file = write_table(&content);

    let set = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap();

    assert_eq!(set.records.len(), 1);
    assert_eq!(set.records[0].order, 2);
    assert_eq!(set.diagnostics.len(), 1);
    assert!(set.diagnostics[0].message.contains("DUMMY"));
}

#[test]
fn test_trace_all_dummy_is_no_match() {
    let content = format!(
        "{}\tPEDIGREE\nA\t100\t1\t1.0\t1.0\t2\t0.1,0.2\tDUMMY\n",
        TRACE_HEADER
    );
    let file = write_table(&content);

    let err = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap_err();

    match err {
        CalrefError::NoMatch { key, .. } => {
            assert!(key.contains("OPT_ELEM A"));
            assert!(key.contains("disqualified"));
        }
        other => panic!("expected NoMatch, got {:?}", other),
    }
}

#[test]
fn test_trace_no_match_reports_key() {
    let content = format!("{}\nB\t200\t1\t1.0\t1.0\t2\t0.1,0.2\n", TRACE_HEADER);
    let file = write_table(&content);

    let err = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap_err();

    match err {
        CalrefError::NoMatch { key, .. } => {
            assert!(key.contains("CENWAVE 100"));
        }
        other => panic!("expected NoMatch, got {:?}", other),
    }
}

#[test]
fn test_trace_zero_row_table_is_no_match_not_crash() {
    let content = format!("{}\n", TRACE_HEADER);
    let file = write_table(&content);

    let err = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap_err();
    assert!(matches!(err, CalrefError::NoMatch { .. }));
}

#[test]
fn test_trace_missing_required_column_is_fatal() {
    // No A2DISPL column.
    let content = "OPT_ELEM\tCENWAVE\tSPORDER\tA1CENTER\tA2CENTER\tNELEM\n\
                   A\t100\t1\t1.0\t1.0\t2\n";
    let file = write_table(content);

    let err = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap_err();
    assert!(matches!(
        err,
        CalrefError::ColumnNotFound { ref column, .. } if column.as_str() == "A2DISPL"
    ));
}

#[test]
fn test_trace_short_read_fails_whole_lookup() {
    // NELEM declares 50, array cell holds 40.
    let cells: Vec<String> = (0..40).map(|i| format!("{}.5", i)).collect();
    let content = format!(
        "{}\nA\t100\t1\t1.0\t1.0\t50\t{}\n",
        TRACE_HEADER,
        cells.join(",")
    );
    let file = write_table(&content);

    let err = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap_err();
    match err {
        CalrefError::Table { row, message, .. } => {
            assert_eq!(row, 1);
            assert!(message.contains("short read"));
        }
        other => panic!("expected Table error, got {:?}", other),
    }
}

#[test]
fn test_trace_oversized_array_is_capacity_exceeded() {
    let content = format!("{}\nA\t100\t1\t1.0\t1.0\t2000\t0.0\n", TRACE_HEADER);
    let file = write_table(&content);

    let err = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap_err();
    assert!(matches!(err, CalrefError::CapacityExceeded { declared: 2000, .. }));
}

#[test]
fn test_trace_rotation_applied_when_expstart_given() {
    let content = format!(
        "{}\tMJD\tDEGPERYR\n\
         A\t100\t1\t1.0\t1.0\t3\t0.0,0.0,0.0\t51000.0\t45.0\n",
        TRACE_HEADER
    );
    let file = write_table(&content);

    // One Julian year after the reference epoch: 45 degrees of shear.
    let set = TraceLookup::new(TraceKey::new("A", 100))
        .with_expstart(51000.0 + 365.25)
        .fetch(file.path())
        .unwrap();

    let angle = set.rotation.expect("rotation should be reported");
    assert!((angle - 45.0).abs() < 1e-9);
    let d = &set.records[0].displacements;
    assert!((d[0] + 1.0).abs() < 1e-9);
    assert!(d[1].abs() < 1e-9);
    assert!((d[2] - 1.0).abs() < 1e-9);
}

#[test]
fn test_trace_rotation_skipped_without_expstart() {
    let content = format!(
        "{}\tMJD\tDEGPERYR\n\
         A\t100\t1\t1.0\t1.0\t2\t0.25,0.75\t51000.0\t45.0\n",
        TRACE_HEADER
    );
    let file = write_table(&content);

    let set = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap();

    assert!(set.rotation.is_none());
    assert_eq!(set.records[0].displacements, vec![0.25, 0.75]);
    assert!(set
        .diagnostics
        .iter()
        .any(|d| d.message.contains("not rotated")));
}

// =============================================================================
// Photometric-correction lookup (first-match + unity fallback)
// =============================================================================

const PCT_HEADER: &str = "APERTURE\tCENWAVE\tEXTRHEIGHT\tNELEM\tWAVELENGTH\tTHROUGHPUT";

#[test]
fn test_pcorr_interpolates_matching_row() {
    let content = format!(
        "#MAXHGHT 11\n{}\n\
         52X0.5\t1425\t7\t3\t1.0,2.0,3.0\t9.0,9.0,9.0\n\
         52X0.5\t1425\t11\t3\t1.0,2.0,3.0\t2.0,4.0,6.0\n",
        PCT_HEADER
    );
    let file = write_table(&content);

    let grid = [1.0, 2.0, 3.0];
    let curve = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch(file.path(), &grid)
        .unwrap();

    // Only the EXTRHEIGHT == MAXHGHT row qualifies, and the spline
    // reproduces its knots exactly.
    assert_eq!(curve.status, CorrectionStatus::Interpolated { row: 2 });
    assert!((curve.factors[0] - 2.0).abs() < 1e-9);
    assert!((curve.factors[1] - 4.0).abs() < 1e-9);
    assert!((curve.factors[2] - 6.0).abs() < 1e-9);
}

#[test]
fn test_pcorr_no_match_yields_unity() {
    let content = format!(
        "#MAXHGHT 11\n{}\n52X2\t5000\t11\t2\t1.0,2.0\t0.5,0.6\n",
        PCT_HEADER
    );
    let file = write_table(&content);

    let grid = [1200.0, 1300.0, 1400.0, 1500.0];
    let curve = PhotCorrLookup::new(PhotCorrKey::new("F1", 5000))
        .fetch(file.path(), &grid)
        .unwrap();

    assert_eq!(curve.factors.len(), grid.len());
    assert!(curve.factors.iter().all(|&f| f == 1.0));
    assert_eq!(
        curve.status,
        CorrectionStatus::UnityFallback {
            reason: FallbackReason::NoMatch
        }
    );
    assert!(!curve.diagnostics.is_empty());
}

#[test]
fn test_pcorr_dummy_first_match_yields_unity() {
    let content = format!(
        "#MAXHGHT 11\n{}\tPEDIGREE\n\
         52X0.5\t1425\t11\t2\t1.0,2.0\t0.5,0.6\tDUMMY\n\
         52X0.5\t1425\t11\t2\t1.0,2.0\t0.7,0.8\tGROUND\n",
        PCT_HEADER
    );
    let file = write_table(&content);

    let grid = [1.5];
    let curve = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch(file.path(), &grid)
        .unwrap();

    // First-match mode aborts on the dummy row; the later good row is
    // never considered.
    assert_eq!(curve.factors, vec![1.0]);
    assert_eq!(
        curve.status,
        CorrectionStatus::UnityFallback {
            reason: FallbackReason::DummyPedigree { row: 1 }
        }
    );
}

#[test]
fn test_pcorr_first_match_wins_among_duplicates() {
    let content = format!(
        "#MAXHGHT 11\n{}\n\
         52X0.5\t1425\t11\t2\t1.0,2.0\t3.0,3.0\n\
         52X0.5\t1425\t11\t2\t1.0,2.0\t7.0,7.0\n",
        PCT_HEADER
    );
    let file = write_table(&content);

    let curve = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch(file.path(), &[1.5])
        .unwrap();

    assert_eq!(curve.status, CorrectionStatus::Interpolated { row: 1 });
    assert!((curve.factors[0] - 3.0).abs() < 1e-9);
}

#[test]
fn test_pcorr_zero_row_table_yields_unity() {
    let content = format!("#MAXHGHT 11\n{}\n", PCT_HEADER);
    let file = write_table(&content);

    let curve = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch(file.path(), &[1.0, 2.0])
        .unwrap();

    assert_eq!(curve.factors, vec![1.0, 1.0]);
    assert!(curve.is_fallback());
}

#[test]
fn test_pcorr_single_sample_is_insufficient_data() {
    let content = format!(
        "#MAXHGHT 11\n{}\n52X0.5\t1425\t11\t1\t1.0\t0.5\n",
        PCT_HEADER
    );
    let file = write_table(&content);

    let err = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch(file.path(), &[1.0])
        .unwrap_err();
    assert!(matches!(err, CalrefError::InsufficientData { got: 1 }));
}

#[test]
fn test_pcorr_missing_maxhght_keyword_is_error() {
    let content = format!("{}\n52X0.5\t1425\t11\t2\t1.0,2.0\t0.5,0.6\n", PCT_HEADER);
    let file = write_table(&content);

    let err = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch(file.path(), &[1.0])
        .unwrap_err();
    assert!(matches!(err, CalrefError::Table { .. }));
}

#[test]
fn test_pcorr_missing_table_is_open_failed() {
    let err = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch("/no/such/pctab.tsv", &[1.0])
        .unwrap_err();
    assert!(matches!(err, CalrefError::OpenFailed { .. }));
}

#[test]
fn test_pcorr_extrapolates_beyond_reference_range() {
    let content = format!(
        "#MAXHGHT 11\n{}\n52X0.5\t1425\t11\t2\t0.0,10.0\t1.0,3.0\n",
        PCT_HEADER
    );
    let file = write_table(&content);

    let curve = PhotCorrLookup::new(PhotCorrKey::new("52X0.5", 1425))
        .fetch(file.path(), &[15.0])
        .unwrap();

    // Two knots: linear extension, no clamping.
    assert!((curve.factors[0] - 4.0).abs() < 1e-9);
}

// =============================================================================
// Column resolution and provenance metadata
// =============================================================================

#[test]
fn test_column_resolution_case_insensitive_end_to_end() {
    let content = "Opt_Elem\tcenwave\nG140L\t1425\n";
    let file = write_table(content);
    let table = RefTable::open(file.path()).unwrap();

    let a = table.find_column("OPT_ELEM").unwrap();
    let b = table.find_column("opt_elem").unwrap();
    let c = table.find_column("Opt_Elem").unwrap();
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_trace_set_carries_source_provenance() {
    let content = format!("{}\nA\t100\t1\t1.0\t1.0\t2\t0.1,0.2\n", TRACE_HEADER);
    let file = write_table(&content);

    let set = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap();

    assert!(set.source.hash.starts_with("sha256:"));
    assert_eq!(set.source.row_count, 1);
}

#[test]
fn test_results_serialize_to_json() {
    let content = format!("{}\nA\t100\t1\t1.0\t1.0\t2\t0.1,0.2\n", TRACE_HEADER);
    let file = write_table(&content);

    let set = TraceLookup::new(TraceKey::new("A", 100))
        .fetch(file.path())
        .unwrap();

    let json = serde_json::to_string(&set).unwrap();
    assert!(json.contains("\"order\":1"));

    let omit = PhotCorrLookup::new(PhotCorrKey::new("X", 1))
        .with_switch(CalSwitch::Omit)
        .fetch("/unused", &[1.0])
        .unwrap();
    let json = serde_json::to_string(&omit).unwrap();
    assert!(json.contains("unity_fallback"));
}
