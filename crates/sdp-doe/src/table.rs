use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use sdp_core::errors::{ErrorInfo, SdpError};
use serde::{Deserialize, Serialize};

/// One design-table row: 1-based file position plus its non-empty cells.
///
/// The position doubles as the experiment identifier; empty cells are dropped
/// at read time so "blank" and "column absent" are indistinguishable
/// downstream, which is exactly the inherit-the-default contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRow {
    /// 1-based position in the table.
    pub index: usize,
    /// Column name to raw cell text, blanks removed.
    pub cells: BTreeMap<String, String>,
}

impl DesignRow {
    /// Experiment identifier derived from the row position.
    pub fn experiment_id(&self) -> String {
        self.index.to_string()
    }

    /// Raw text for a column, if the cell was present and non-empty.
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

fn table_error(code: &str, message: impl Into<String>) -> SdpError {
    SdpError::Table(ErrorInfo::new(code, message))
}

/// Reads an ordered design table from a CSV file.
pub fn read_design_table(path: &Path) -> Result<Vec<DesignRow>, SdpError> {
    let file = File::open(path).map_err(|err| {
        SdpError::Table(
            ErrorInfo::new("table.open", "failed to open design table")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    parse_design_table(file)
}

/// Parses an ordered design table from any reader.
pub fn parse_design_table(input: impl Read) -> Result<Vec<DesignRow>, SdpError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input);
    let headers = reader
        .headers()
        .map_err(|err| table_error("table.headers", err.to_string()))?
        .clone();
    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|err| {
            SdpError::Table(
                ErrorInfo::new("table.record", "failed to read design row")
                    .with_context("experiment", (idx + 1).to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let mut cells = BTreeMap::new();
        for (column, raw) in headers.iter().zip(record.iter()) {
            if !raw.is_empty() {
                cells.insert(column.to_string(), raw.to_string());
            }
        }
        rows.push(DesignRow {
            index: idx + 1,
            cells,
        });
    }
    Ok(rows)
}
