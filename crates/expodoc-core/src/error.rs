//! Error types for Expodoc Core
//!
//! Provides error handling for:
//! - Schema checks on uploaded tables (missing required columns)
//! - Row-scoped date coercion failures (non-fatal, collected)
//! - Comment store loading and persistence
//! - Configuration loading

use std::path::PathBuf;

/// Required column missing from an input table
///
/// Raised before any enrichment happens, so no partial result exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A column the rules read is absent from the table header
    #[error("required column missing: '{column}'")]
    MissingColumn { column: String },
}

impl SchemaError {
    /// Create missing column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Name of the offending column
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::MissingColumn { column } => column,
        }
    }
}

/// A single cell that could not be read as a calendar date
///
/// Never aborts enrichment: the date becomes missing and the issue is
/// reported alongside the enriched rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("row {row}: cannot read '{raw}' in column '{column}' as a date")]
pub struct DateParseError {
    /// Zero-based row index in the input table
    pub row: usize,
    /// Column the value came from
    pub column: String,
    /// Raw value as text
    pub raw: String,
}

/// Errors while loading the durable comment store
#[derive(Debug, thiserror::Error)]
pub enum StoreLoadError {
    /// IO error during file read
    #[error("io error reading comment store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exists but is not a JSON object of strings
    #[error("comment store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreLoadError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Comment store could not be written
///
/// The previous durable copy is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// IO error while writing or renaming the store file
    #[error("io error writing comment store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store could not be serialized
    #[error("failed to serialize comment store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend refused the write
    #[error("comment store unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Reconciliation failures
///
/// The in-memory store already holds the edited comments when this is
/// returned; only the durable copy is stale.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// Comments were applied in memory but not written to disk
    #[error("comments were kept for this session only and were not saved: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("io error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML
    #[error("invalid config {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Combined core error
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("store error: {0}")]
    StoreLoad(#[from] StoreLoadError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_column() {
        let err = SchemaError::missing_column("Doc Entry SAP");
        assert_eq!(err.to_string(), "required column missing: 'Doc Entry SAP'");
        assert_eq!(err.column(), "Doc Entry SAP");
    }

    #[test]
    fn date_parse_error_display() {
        let err = DateParseError {
            row: 3,
            column: "ETA".to_string(),
            raw: "soon".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "row 3: cannot read 'soon' in column 'ETA' as a date"
        );
    }

    #[test]
    fn reconcile_error_mentions_session() {
        let err: ReconcileError =
            PersistenceError::Unavailable("read-only".to_string()).into();
        let msg = err.to_string();
        assert!(msg.contains("this session only"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn error_conversions() {
        let schema = SchemaError::missing_column("ETA");
        let report: ReportError = schema.into();
        assert!(matches!(report, ReportError::Schema(_)));
    }
}
