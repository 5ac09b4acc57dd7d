//! TSV-backed reference table reader.
//!
//! Reference tables are delimited text files with an optional block of
//! header keywords before the column header row:
//!
//! ```text
//! #MAXHGHT 11
//! APERTURE	CENWAVE	EXTRHEIGHT	NELEM	WAVELENGTH	THROUGHPUT
//! 52X0.5	1425	11	3	1200,1400,1600	0.91,0.94,0.96
//! ```
//!
//! Array cells hold comma-separated numbers inside a single field,
//! which is why the field delimiter defaults to tab.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::store::{ColumnHandle, TableStore};
use crate::error::{CalrefError, Result};

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Separator between elements of an array cell.
    pub array_separator: char,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            array_separator: ',',
        }
    }
}

/// Provenance metadata recorded when a table is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the table was opened.
    pub opened_at: DateTime<Utc>,
}

/// An open, read-only reference table.
///
/// The whole file is parsed at open time; dropping the value releases
/// everything, so early-return error paths cannot leak the handle.
#[derive(Debug, Clone)]
pub struct RefTable {
    name: String,
    metadata: TableMetadata,
    /// Column name -> handle, in table-defined order.
    columns: IndexMap<String, ColumnHandle>,
    /// Header keywords, in file order.
    keywords: IndexMap<String, String>,
    /// Row data as strings (row-major order).
    rows: Vec<Vec<String>>,
    array_separator: char,
}

impl RefTable {
    /// Open a reference table with the default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a reference table with a custom configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: ReaderConfig) -> Result<Self> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CalrefError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let size_bytes = file
            .metadata()
            .map_err(|e| CalrefError::Io {
                path: path.to_path_buf(),
                source: e,
            })?
            .len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| CalrefError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (keywords, body, body_start_line) = split_keywords(path, &contents)?;
        let (columns, rows) = parse_body(path, body, body_start_line, config.delimiter)?;

        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let metadata = TableMetadata {
            file: name.clone(),
            path: path.to_path_buf(),
            hash,
            size_bytes,
            row_count: rows.len(),
            column_count: columns.len(),
            opened_at: Utc::now(),
        };

        Ok(Self {
            name,
            metadata,
            columns,
            keywords,
            rows,
            array_separator: config.array_separator,
        })
    }

    /// Provenance metadata recorded at open time.
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    /// Column names in table-defined order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|s| s.as_str())
    }

    /// Header keywords in file order.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fetch a cell, with bounds checks folded into `Table` errors.
    fn cell(&self, column: ColumnHandle, row: usize) -> Result<&str> {
        if row == 0 || row > self.rows.len() {
            return Err(CalrefError::Table {
                table: self.name.clone(),
                row,
                message: format!("row out of range (table has {} rows)", self.rows.len()),
            });
        }
        self.rows[row - 1]
            .get(column.0)
            .map(|s| s.as_str())
            .ok_or_else(|| CalrefError::Table {
                table: self.name.clone(),
                row,
                message: format!("column index {} out of range", column.0),
            })
    }

    fn column_label(&self, column: ColumnHandle) -> &str {
        self.columns
            .get_index(column.0)
            .map(|(name, _)| name.as_str())
            .unwrap_or("?")
    }

    fn parse_error(&self, column: ColumnHandle, row: usize, value: &str, wanted: &str) -> CalrefError {
        CalrefError::Table {
            table: self.name.clone(),
            row,
            message: format!(
                "column {}: '{}' is not {}",
                self.column_label(column),
                value,
                wanted
            ),
        }
    }
}

impl TableStore for RefTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn find_column(&self, name: &str) -> Option<ColumnHandle> {
        // First exact case-insensitive match wins, in column order.
        self.columns
            .iter()
            .find(|(col, _)| col.eq_ignore_ascii_case(name))
            .map(|(_, handle)| *handle)
    }

    fn header_int(&self, keyword: &str) -> Result<i64> {
        let value = self
            .keywords
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(keyword))
            .map(|(_, v)| v.as_str())
            .ok_or_else(|| CalrefError::Table {
                table: self.name.clone(),
                row: 0,
                message: format!("header keyword {} not found", keyword),
            })?;
        value.trim().parse::<i64>().map_err(|_| CalrefError::Table {
            table: self.name.clone(),
            row: 0,
            message: format!("header keyword {}: '{}' is not an integer", keyword, value),
        })
    }

    fn read_text(&self, column: ColumnHandle, row: usize) -> Result<String> {
        Ok(self.cell(column, row)?.trim().to_string())
    }

    fn read_int(&self, column: ColumnHandle, row: usize) -> Result<i64> {
        let value = self.cell(column, row)?.trim();
        value
            .parse::<i64>()
            .map_err(|_| self.parse_error(column, row, value, "an integer"))
    }

    fn read_double(&self, column: ColumnHandle, row: usize) -> Result<f64> {
        let value = self.cell(column, row)?.trim();
        value
            .parse::<f64>()
            .map_err(|_| self.parse_error(column, row, value, "a number"))
    }

    fn read_array(&self, column: ColumnHandle, row: usize, count: usize) -> Result<Vec<f64>> {
        let cell = self.cell(column, row)?.trim();
        let mut values = Vec::with_capacity(count);
        if cell.is_empty() {
            return Ok(values);
        }
        for part in cell.split(self.array_separator) {
            if values.len() == count {
                break;
            }
            let part = part.trim();
            let v = part
                .parse::<f64>()
                .map_err(|_| self.parse_error(column, row, part, "a number (array element)"))?;
            values.push(v);
        }
        Ok(values)
    }
}

/// Split leading `#KEYWORD value` lines from the table body.
///
/// Returns the keywords, the body text, and the 1-based line number at
/// which the body starts (for parse errors).
fn split_keywords<'a>(
    path: &Path,
    contents: &'a [u8],
) -> Result<(IndexMap<String, String>, &'a str, usize)> {
    let text = std::str::from_utf8(contents).map_err(|e| CalrefError::Parse {
        path: path.to_path_buf(),
        line: 0,
        message: format!("not valid UTF-8: {}", e),
    })?;

    let mut keywords = IndexMap::new();
    let mut offset = 0;
    let mut line_no = 0;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if !trimmed.starts_with('#') {
            break;
        }
        line_no += 1;
        let entry = trimmed[1..].trim();
        if entry.is_empty() {
            // Bare '#' line: a comment, skipped.
            offset += line.len();
            continue;
        }
        let (key, value) = match entry.split_once(char::is_whitespace) {
            Some((k, v)) => (k, v.trim()),
            None => {
                return Err(CalrefError::Parse {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("header keyword '{}' has no value", entry),
                });
            }
        };
        keywords.insert(key.to_string(), value.to_string());
        offset += line.len();
    }

    Ok((keywords, &text[offset..], line_no + 1))
}

/// Parse the delimited body into column handles and string rows.
fn parse_body(
    path: &Path,
    body: &str,
    body_start_line: usize,
    delimiter: u8,
) -> Result<(IndexMap<String, ColumnHandle>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.trim().to_string()).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(CalrefError::Parse {
            path: path.to_path_buf(),
            line: body_start_line,
            message: "no column header row found".to_string(),
        });
    }

    let mut columns = IndexMap::with_capacity(headers.len());
    for (i, name) in headers.iter().enumerate() {
        columns.entry(name.clone()).or_insert(ColumnHandle(i));
    }

    let expected_cols = headers.len();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        // Ragged rows are padded or truncated to the header width.
        while row.len() < expected_cols {
            row.push(String::new());
        }
        row.truncate(expected_cols);
        rows.push(row);
    }

    Ok((columns, rows))
}
