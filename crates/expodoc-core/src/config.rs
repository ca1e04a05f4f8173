//! Report configuration
//!
//! Column names, comment store location and worksheet selection. Every
//! field has a default matching the export control workbook, so an empty
//! TOML file is a valid configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default comment store file name
pub const DEFAULT_STORE_FILE: &str = "comentarios.json";

/// Names of the columns the rules read and write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Stable record identifier (comment store key)
    pub id: String,
    /// Courier tracking number
    pub dhl: String,
    /// Estimated departure date
    pub etd: String,
    /// Estimated arrival date
    pub eta: String,
    /// Invoice number
    pub invoice: String,
    /// Reporting period
    pub period: String,
    /// Company
    pub company: String,
    /// Derived documentary status
    pub status: String,
    /// Derived billing lateness flag
    pub billing_overdue: String,
    /// Merged free-text comment
    pub comment: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: "Doc Entry SAP".to_string(),
            dhl: "DHL #".to_string(),
            etd: "ETD".to_string(),
            eta: "ETA".to_string(),
            invoice: "Invoice #".to_string(),
            period: "Period".to_string(),
            company: "Empresa".to_string(),
            status: "Estado Documental".to_string(),
            billing_overdue: "Fuera Plazo Facturación".to_string(),
            comment: "Comentarios".to_string(),
        }
    }
}

impl ColumnMap {
    /// Columns that must exist for enrichment to start
    #[must_use]
    pub fn required(&self) -> [&str; 3] {
        [&self.id, &self.eta, &self.etd]
    }

    /// Columns appended by enrichment, in output order
    #[must_use]
    pub fn derived(&self) -> [&str; 3] {
        [&self.status, &self.billing_overdue, &self.comment]
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Column names
    pub columns: ColumnMap,
    /// Comment store location
    pub store_path: PathBuf,
    /// Worksheet to read from workbooks (first sheet when unset)
    pub sheet: Option<String>,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            sheet: None,
            log_filter: "info".to_string(),
        }
    }
}

impl ReportConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// With comment store path
    #[inline]
    #[must_use]
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// With worksheet name
    #[inline]
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// With column map
    #[inline]
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }
}
