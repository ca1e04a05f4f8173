//! JSON table reader: an array of flat objects, one per row

use super::{ReadOptions, TableReader};
use crate::error::{TableError, TableResult};
use expodoc_core::{Cell, Dataset, Row};
use serde_json::Value;
use std::path::Path;

/// JSON reader
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl JsonReader {
    /// Build a dataset from an already parsed value
    ///
    /// The header is the union of object keys in first-seen order.
    ///
    /// # Errors
    /// Returns a description of the offending value when it is not an
    /// array of objects
    pub fn from_value(value: Value) -> Result<Dataset, String> {
        let Value::Array(items) = value else {
            return Err(format!("found {}", kind(&value)));
        };
        let mut dataset = Dataset::default();
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(fields) = item else {
                return Err(format!("found {} at index {index}", kind(&item)));
            };
            let row: Row = fields.into_iter().map(|(k, v)| (k, to_cell(v))).collect();
            dataset.push(row);
        }
        Ok(dataset)
    }
}

impl TableReader for JsonReader {
    fn name(&self) -> &'static str {
        "json"
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> TableResult<Dataset> {
        let text = std::fs::read_to_string(path).map_err(|e| TableError::io_error(path, e))?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| TableError::json_error(path, e))?;
        Self::from_value(value).map_err(|found| TableError::Shape {
            path: path.to_path_buf(),
            found,
        })
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }
}

fn to_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => n
            .as_i64()
            .map(Cell::Int)
            .or_else(|| n.as_f64().map(Cell::Float))
            .unwrap_or(Cell::Empty),
        Value::String(s) => Cell::Text(s),
        nested => Cell::Text(nested.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
