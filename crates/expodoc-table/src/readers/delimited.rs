//! CSV reader
//!
//! Comma and semicolon separated exports are both accepted; the separator
//! is picked from the header line unless one is set explicitly.

use super::{ReadOptions, TableReader};
use crate::error::{TableError, TableResult};
use expodoc_core::{Cell, Dataset};
use std::io::Read;
use std::path::Path;

/// Delimited text reader
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReader {
    delimiter: Option<u8>,
}

impl CsvReader {
    /// Reader that detects the separator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader with a fixed separator
    #[inline]
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Read CSV text from any source
    ///
    /// # Errors
    /// Returns error if the input is not valid CSV or not UTF-8
    pub fn read_from<R: Read>(&self, mut source: R) -> Result<Dataset, csv::Error> {
        let mut text = String::new();
        source.read_to_string(&mut text)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        let delimiter = self.delimiter.unwrap_or_else(|| sniff_delimiter(text));

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let header: Vec<String> = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut dataset = Dataset::new(header);
        for record in reader.records() {
            let record = record?;
            dataset.push_values(record.iter().map(parse_field));
        }
        Ok(dataset)
    }
}

impl TableReader for CsvReader {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> TableResult<Dataset> {
        let file = std::fs::File::open(path).map_err(|e| TableError::io_error(path, e))?;
        self.read_from(file).map_err(|e| TableError::csv_error(path, e))
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }
}

fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

/// Type a raw field the way a spreadsheet would: numbers become numbers,
/// blanks become empty, everything else stays text.
///
/// A field only becomes a number when the number prints back as the same
/// text, so codes like `007`, `3.10` or `1e5` are kept verbatim.
fn parse_field(raw: &str) -> Cell {
    if raw.trim().is_empty() {
        return Cell::Empty;
    }
    if let Ok(n) = raw.parse::<i64>() {
        if n.to_string() == raw {
            return Cell::Int(n);
        }
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() && f.to_string() == raw {
            return Cell::Float(f);
        }
    }
    Cell::Text(raw.to_string())
}
