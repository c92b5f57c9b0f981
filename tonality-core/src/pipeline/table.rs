//! Uploaded review tables.
//!
//! A table is the parsed CSV: a header row and data rows of optional
//! cells. Only one column matters for prediction; everything else is kept
//! as-is so a front end can show it next to the predicted label.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{PredictError, Result};

/// Minimal view of a row that batch prediction needs.
pub trait ReviewRecord {
    /// The review cell, `None` when missing.
    fn review(&self) -> Option<&str>;

    /// Whether any cell of the row is missing.
    fn has_missing(&self) -> bool;
}

/// A bare review cell is a one-column record.
impl ReviewRecord for Option<String> {
    fn review(&self) -> Option<&str> {
        self.as_deref()
    }

    fn has_missing(&self) -> bool {
        self.is_none()
    }
}

impl ReviewRecord for Option<&str> {
    fn review(&self) -> Option<&str> {
        *self
    }

    fn has_missing(&self) -> bool {
        self.is_none()
    }
}

/// Tabular review data with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl ReviewTable {
    /// Builds a table, padding short rows with missing cells.
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<Option<String>>>) -> Self {
        for row in &mut rows {
            if row.len() < headers.len() {
                row.resize(headers.len(), None);
            }
        }
        Self { headers, rows }
    }

    /// Parses CSV with a header row.
    ///
    /// Cells equal to one of `missing_markers` become missing, as do the
    /// trailing cells of rows shorter than the header.
    ///
    /// # Errors
    ///
    /// [`PredictError::Csv`] for unreadable input and
    /// [`PredictError::RaggedRow`] for a row with more fields than the header.
    pub fn from_reader<R: io::Read>(reader: R, missing_markers: &[String]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.len() > width {
                return Err(PredictError::RaggedRow {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: width,
                    found: record.len(),
                });
            }

            let mut cells: Vec<Option<String>> = record
                .iter()
                .map(|field| {
                    if missing_markers.iter().any(|m| m == field) {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            cells.resize(width, None);
            rows.push(cells);
        }

        Ok(Self { headers, rows })
    }

    /// Opens and parses a CSV file.
    pub fn from_path(path: &Path, missing_markers: &[String]) -> Result<Self> {
        let file = File::open(path).map_err(|source| PredictError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(io::BufReader::new(file), missing_markers)
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Index of the first column named `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of data row `index`.
    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Row views exposing `column` as the review, in file order.
    pub fn records(&self, column: usize) -> impl Iterator<Item = TableRecord<'_>> + '_ {
        self.rows.iter().map(move |cells| TableRecord { cells, column })
    }
}

/// A borrowed table row with a designated review column.
#[derive(Debug, Clone, Copy)]
pub struct TableRecord<'a> {
    cells: &'a [Option<String>],
    column: usize,
}

impl ReviewRecord for TableRecord<'_> {
    fn review(&self) -> Option<&str> {
        self.cells.get(self.column).and_then(|c| c.as_deref())
    }

    fn has_missing(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }
}
