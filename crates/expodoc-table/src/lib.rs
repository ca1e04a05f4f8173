//! Expodoc Table
//!
//! Reads uploaded shipment tables into [`expodoc_core::Dataset`] and writes
//! enriched results back out.
//!
//! - [`ReaderRegistry`]: picks a [`TableReader`] by file extension
//! - [`WorkbookReader`]: xlsx, xlsm, xlsb, xls and ods via calamine
//! - [`CsvReader`]: comma or semicolon separated text
//! - [`JsonReader`]: arrays of flat objects
//! - [`write_table`]: CSV or JSON output
//!
//! # Example
//!
//! ```rust,ignore
//! use expodoc_table::{read_table, write_table, ReadOptions, TableFormat};
//!
//! let upload = read_table("control_exportaciones.xlsx", &ReadOptions::new())?;
//! write_table(&upload, "copia.csv", TableFormat::Csv)?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod readers;
pub mod writers;

pub use error::{TableError, TableResult};
pub use readers::{
    default_readers, read_table, CsvReader, JsonReader, ReadOptions, ReaderRegistry, TableReader,
    WorkbookReader,
};
pub use writers::{write_csv, write_json, write_table, write_to, TableFormat};
