//! Tabular input: CSV reading and column selection.
//!
//! Inputs are plain CSV; anything else is rejected up front as an
//! input-format error so no half-built mapping or partial batch ever runs
//! against a file we cannot parse.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::IngestError;

/// An in-memory table: header row plus string cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Column index by header name, or a structured error listing the
    /// available headers.
    pub fn require_column(&self, name: &str, path: &str) -> Result<usize, IngestError> {
        self.column_index(name)
            .ok_or_else(|| IngestError::MissingColumn {
                column: name.to_string(),
                path: path.to_string(),
                available: self.headers.join(", "),
            })
    }

    /// Values of one column, top to bottom; short rows yield empty fields.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(idx).map(String::as_str).unwrap_or(""))
    }
}

/// Read a CSV file into memory. Non-`.csv` paths (spreadsheets included)
/// are an input-format error; see the crate docs for why spreadsheets are
/// not parsed directly.
pub fn read_table(path: &str) -> Result<Table, IngestError> {
    ensure_csv_extension(path)?;
    let file = File::open(path).map_err(|e| IngestError::Io {
        path: path.to_string(),
        source: e,
    })?;
    read_table_from(file, path)
}

fn ensure_csv_extension(path: &str) -> Result<(), IngestError> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => Ok(()),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_string(),
        }),
    }
}

/// Read CSV from any reader; `path` only labels errors.
pub fn read_table_from<R: Read>(reader: R, path: &str) -> Result<Table, IngestError> {
    let parse_err = |e: csv::Error| IngestError::Parse {
        path: path.to_string(),
        source: e,
    };
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(parse_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table { headers, rows })
}

/// Extract (name, code) pairs for the mapping builder from the selected
/// reference columns, in row order.
pub fn mapping_pairs(table: &Table, name_idx: usize, code_idx: usize) -> Vec<(String, String)> {
    table
        .rows
        .iter()
        .map(|row| {
            (
                row.get(name_idx).cloned().unwrap_or_default(),
                row.get(code_idx).cloned().unwrap_or_default(),
            )
        })
        .collect()
}
