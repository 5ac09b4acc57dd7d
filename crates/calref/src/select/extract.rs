//! Variable-length array extraction with count validation.

use crate::error::{CalrefError, Result};
use crate::table::{ColumnHandle, TableStore};

/// Read a row's declared element count, then exactly that many array
/// values.
///
/// Fails with [`CalrefError::CapacityExceeded`] when the declared
/// count exceeds `capacity` (the reference data is corrupt or the
/// caller's buffer limit is too small), and with a short-read
/// [`CalrefError::Table`] when the storage layer yields fewer elements
/// than declared. No partial array is ever returned.
pub fn extract_array<T: TableStore>(
    store: &T,
    row: usize,
    count_column: ColumnHandle,
    array_column: ColumnHandle,
    capacity: usize,
) -> Result<Vec<f64>> {
    let declared = store.read_int(count_column, row)?;
    if declared < 0 {
        return Err(CalrefError::Table {
            table: store.name().to_string(),
            row,
            message: format!("declared element count {} is negative", declared),
        });
    }
    let declared = declared as usize;
    if declared > capacity {
        return Err(CalrefError::CapacityExceeded {
            table: store.name().to_string(),
            row,
            declared,
            capacity,
        });
    }

    let values = store.read_array(array_column, row, declared)?;
    if values.len() < declared {
        return Err(CalrefError::Table {
            table: store.name().to_string(),
            row,
            message: format!(
                "short read: {} of {} declared elements present",
                values.len(),
                declared
            ),
        });
    }
    Ok(values)
}
