//! Table readers for different file formats
//!
//! Turns uploaded files into a [`Dataset`]:
//! - Workbooks (xlsx, xlsm, xls, ods) via calamine
//! - Delimited text (csv) via csv
//! - Arrays of flat objects (json) via serde_json

use crate::error::{TableError, TableResult};
use expodoc_core::Dataset;
use std::path::Path;

mod delimited;
mod json;
mod workbook;

pub use delimited::CsvReader;
pub use json::JsonReader;
pub use workbook::WorkbookReader;

/// Options shared by all readers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Worksheet to read from workbooks (first sheet when unset)
    pub sheet: Option<String>,
}

impl ReadOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With worksheet name
    #[inline]
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Reader trait for turning a file into a [`Dataset`]
///
/// Implement this trait to add support for new file formats.
pub trait TableReader: Send + Sync + 'static {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Read the whole table at `path`
    ///
    /// # Errors
    /// Returns error if the file cannot be read or decoded
    fn read(&self, path: &Path, options: &ReadOptions) -> TableResult<Dataset>;

    /// Supported file extensions (without dot, lowercase)
    fn extensions(&self) -> &[&str];

    /// Check if this reader can handle the given path
    fn can_read(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

/// Reader registration, selected by file extension
pub struct ReaderRegistry {
    readers: Vec<Box<dyn TableReader>>,
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("reader_count", &self.readers.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ReaderRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
        }
    }

    /// Register a reader; earlier registrations win on shared extensions
    pub fn register<R: TableReader>(&mut self, reader: R) {
        self.readers.push(Box::new(reader));
    }

    /// Find reader for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn TableReader> {
        self.readers.iter().find(|r| r.can_read(path)).map(|r| &**r)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.readers
            .iter()
            .flat_map(|r| r.extensions())
            .copied()
            .collect()
    }

    /// Read `path` with the matching reader
    ///
    /// # Errors
    /// Returns [`TableError::UnsupportedFormat`] when no reader matches, or
    /// the reader's own error
    pub fn read(&self, path: &Path, options: &ReadOptions) -> TableResult<Dataset> {
        let reader = self
            .find_for_path(path)
            .ok_or_else(|| TableError::UnsupportedFormat {
                path: path.to_path_buf(),
                supported: self.all_extensions().join(", "),
            })?;
        tracing::debug!("Reading {} with {} reader", path.display(), reader.name());
        let dataset = reader.read(path, options)?;
        tracing::info!(
            "Read {} rows, {} columns from {}",
            dataset.len(),
            dataset.columns().len(),
            path.display()
        );
        Ok(dataset)
    }
}

/// Create default reader registry with built-in readers
#[inline]
#[must_use]
pub fn default_readers() -> ReaderRegistry {
    let mut registry = ReaderRegistry::new();
    registry.register(WorkbookReader);
    registry.register(CsvReader::new());
    registry.register(JsonReader);
    registry
}

/// Read a table with the default readers
///
/// # Errors
/// Returns error if the extension is unsupported or the file is unreadable
pub fn read_table(path: impl AsRef<Path>, options: &ReadOptions) -> TableResult<Dataset> {
    default_readers().read(path.as_ref(), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_formats() {
        let registry = default_readers();
        for name in ["a.xlsx", "a.XLSX", "a.xls", "a.xlsm", "a.ods", "a.csv", "a.json"] {
            assert!(
                registry.find_for_path(Path::new(name)).is_some(),
                "no reader for {name}"
            );
        }
        assert_eq!(
            registry.find_for_path(Path::new("a.csv")).map(|r| r.name()),
            Some("csv")
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_table("report.pdf", &ReadOptions::new()).unwrap_err();
        match err {
            TableError::UnsupportedFormat { supported, .. } => {
                assert!(supported.contains("xlsx"));
                assert!(supported.contains("csv"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn path_without_extension_is_rejected() {
        let registry = default_readers();
        assert!(registry.find_for_path(Path::new("upload")).is_none());
    }
}
