//! Table writers
//!
//! Enriched or filtered datasets go back out as CSV (header plus one line
//! per row, dates in ISO form) or as a JSON array of row objects.

use crate::error::{TableError, TableResult};
use expodoc_core::Dataset;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Comma separated values
    #[default]
    Csv,
    /// Pretty-printed JSON array of objects
    Json,
}

impl TableFormat {
    /// All formats
    pub const ALL: [Self; 2] = [Self::Csv, Self::Json];

    /// File extension (without dot)
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Format implied by a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown output format '{s}' (expected csv or json)"))
    }
}

/// Write `dataset` as CSV
///
/// # Errors
/// Returns error if the sink fails
pub fn write_csv<W: Write>(dataset: &Dataset, sink: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(dataset.columns().iter().map(|c| row.get(c).to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `dataset` as a pretty JSON array of objects
///
/// # Errors
/// Returns error if serialization or the sink fails
pub fn write_json<W: Write>(dataset: &Dataset, mut sink: W) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(&mut sink, dataset)?;
    sink.write_all(b"\n").map_err(serde_json::Error::io)?;
    sink.flush().map_err(serde_json::Error::io)
}

/// Write `dataset` to any sink in `format`
///
/// # Errors
/// Returns error if writing fails; `label` names the sink in the error
pub fn write_to<W: Write>(
    dataset: &Dataset,
    sink: W,
    format: TableFormat,
    label: &Path,
) -> TableResult<()> {
    match format {
        TableFormat::Csv => {
            write_csv(dataset, sink).map_err(|e| TableError::csv_error(label, e))
        }
        TableFormat::Json => {
            write_json(dataset, sink).map_err(|e| TableError::json_error(label, e))
        }
    }
}

/// Write `dataset` to a file at `path`
///
/// # Errors
/// Returns error if the file cannot be created or written
pub fn write_table(
    dataset: &Dataset,
    path: impl AsRef<Path>,
    format: TableFormat,
) -> TableResult<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| TableError::io_error(path, e))?;
    write_to(dataset, std::io::BufWriter::new(file), format, path)?;
    tracing::info!("Wrote {} rows to {} as {format}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use expodoc_core::Row;

    fn sample() -> Dataset {
        let mut ds = Dataset::new(["id", "ETA", "note"]);
        ds.push(
            Row::new()
                .with("id", 100.0)
                .with("ETA", chrono::NaiveDate::from_ymd_opt(2024, 6, 20).unwrap())
                .with("note", "a, b"),
        );
        ds.push(Row::new().with("id", 101_i64));
        ds
    }

    #[test]
    fn csv_output_quotes_and_fills_gaps() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,ETA,note\n100,2024-06-20,\"a, b\"\n101,,\n"
        );
    }

    #[test]
    fn json_output_is_array_of_objects() {
        let mut out = Vec::new();
        write_json(&sample(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["ETA"], "2024-06-20");
        assert_eq!(value[1]["id"], 101);
        assert!(value[1].get("ETA").is_none());
    }

    #[test]
    fn format_from_name_and_path() {
        assert_eq!("JSON".parse::<TableFormat>(), Ok(TableFormat::Json));
        assert!("xml".parse::<TableFormat>().is_err());
        assert_eq!(TableFormat::from_path(Path::new("out.CSV")), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_path(Path::new("out")), None);
    }
}
