//! Error types for table I/O

use std::path::{Path, PathBuf};

/// Errors reading or writing tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// No reader or writer handles this file
    #[error("unsupported table format: {path} (supported: {supported})")]
    UnsupportedFormat { path: PathBuf, supported: String },

    /// IO error during file access
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("csv error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Malformed JSON
    #[error("json error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON that is not an array of flat objects
    #[error("{path}: expected an array of objects, {found}")]
    Shape { path: PathBuf, found: String },

    /// Workbook could not be opened or decoded
    #[error("workbook error in {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Requested worksheet does not exist, or the workbook has none
    #[error("worksheet not found in {path}: {sheet}")]
    SheetNotFound { path: PathBuf, sheet: String },
}

impl TableError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create CSV error for path
    pub fn csv_error(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create JSON error for path
    pub fn json_error(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create workbook error for path
    pub fn workbook_error(path: &Path, message: impl ToString) -> Self {
        Self::Workbook {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Result type alias for table operations
pub type TableResult<T> = Result<T, TableError>;
