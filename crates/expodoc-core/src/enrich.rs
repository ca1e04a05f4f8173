//! Dataset enrichment
//!
//! Turns an uploaded table into [`EnrichedRecord`]s: dates coerced, status
//! and billing flag derived with one shared evaluation date, comments merged
//! in from the [`CommentStore`]. The input table and the store are only
//! read.

use crate::billing::is_billing_overdue;
use crate::config::ColumnMap;
use crate::dates::coerce_cell;
use crate::error::{DateParseError, SchemaError};
use crate::status::{classify, DocumentaryStatus};
use crate::store::CommentStore;
use crate::table::{Cell, Dataset, Row};
use chrono::NaiveDate;
use serde::Serialize;

/// Typed view of the fields the rules read from one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentRecord {
    /// Zero-based position in the uploaded table
    pub row_index: usize,
    /// Canonical identifier, `None` when the cell is blank
    pub id: Option<String>,
    pub dhl_number: Option<String>,
    pub invoice_number: Option<String>,
    pub etd: Option<NaiveDate>,
    pub eta: Option<NaiveDate>,
    pub period: Option<String>,
    pub company: Option<String>,
}

/// A shipment with derived status, billing flag and merged comment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: ShipmentRecord,
    pub status: DocumentaryStatus,
    pub billing_overdue: bool,
    pub comment: String,
    #[serde(skip)]
    source: Row,
}

impl EnrichedRecord {
    /// Original cells of the uploaded row
    #[inline]
    #[must_use]
    pub fn source(&self) -> &Row {
        &self.source
    }
}

/// Result of [`Enricher::enrich`]
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedDataset {
    columns: Vec<String>,
    column_map: ColumnMap,
    evaluation_date: NaiveDate,
    records: Vec<EnrichedRecord>,
    date_issues: Vec<DateParseError>,
}

impl EnrichedDataset {
    /// Records in upload order
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    /// Date every record was evaluated against
    #[inline]
    #[must_use]
    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    /// Unreadable date cells found during enrichment
    #[inline]
    #[must_use]
    pub fn date_issues(&self) -> &[DateParseError] {
        &self.date_issues
    }

    /// Column names used for this dataset
    #[inline]
    #[must_use]
    pub fn column_map(&self) -> &ColumnMap {
        &self.column_map
    }

    /// Number of records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record by canonical identifier (first match)
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&EnrichedRecord> {
        self.records.iter().find(|r| r.record.id.as_deref() == Some(id))
    }

    /// Edit the comment of every record carrying `id`; returns how many changed
    pub fn set_comment(&mut self, id: &str, comment: impl Into<String>) -> usize {
        let comment = comment.into();
        let mut touched = 0;
        for record in &mut self.records {
            if record.record.id.as_deref() == Some(id) {
                record.comment.clone_from(&comment);
                touched += 1;
            }
        }
        touched
    }

    /// Keep only records matching `predicate`
    #[must_use]
    pub fn retain<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&EnrichedRecord) -> bool,
    {
        self.records.retain(|r| predicate(r));
        self
    }

    /// Flatten back into a table: input columns (dates coerced) followed by
    /// the status label, the billing flag and the comment.
    #[must_use]
    pub fn to_dataset(&self) -> Dataset {
        let map = &self.column_map;
        let mut columns = self.columns.clone();
        for derived in map.derived() {
            if !columns.iter().any(|c| c == derived) {
                columns.push(derived.to_string());
            }
        }

        let mut table = Dataset::new(columns);
        for enriched in &self.records {
            let mut row: Row = self
                .columns
                .iter()
                .map(|c| (c.clone(), enriched.source.get(c).clone()))
                .collect();
            row.set(map.etd.as_str(), Cell::from(enriched.record.etd));
            row.set(map.eta.as_str(), Cell::from(enriched.record.eta));
            row.set(map.status.as_str(), enriched.status.label());
            row.set(map.billing_overdue.as_str(), enriched.billing_overdue);
            row.set(map.comment.as_str(), enriched.comment.as_str());
            table.push(row);
        }
        table
    }
}

/// Applies the documentary rules to uploaded tables
#[derive(Debug, Clone)]
pub struct Enricher {
    columns: ColumnMap,
    evaluation_date: NaiveDate,
}

impl Enricher {
    /// Create enricher evaluating against `evaluation_date`
    #[inline]
    #[must_use]
    pub fn new(evaluation_date: NaiveDate) -> Self {
        Self {
            columns: ColumnMap::default(),
            evaluation_date,
        }
    }

    /// With custom column names
    #[inline]
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// Enrich every row of `dataset`.
    ///
    /// # Errors
    /// Returns [`SchemaError`] if the identifier, ETA or ETD column is absent.
    /// Unreadable individual dates are not errors; see
    /// [`EnrichedDataset::date_issues`].
    pub fn enrich(
        &self,
        dataset: &Dataset,
        store: &CommentStore,
    ) -> Result<EnrichedDataset, SchemaError> {
        let map = &self.columns;
        if let Some(missing) = map.required().into_iter().find(|c| !dataset.has_column(c)) {
            tracing::warn!("Rejecting upload: column '{}' is missing", missing);
            return Err(SchemaError::missing_column(missing));
        }

        let today = self.evaluation_date;
        let mut date_issues = Vec::new();
        let records: Vec<EnrichedRecord> = dataset
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let record = self.read_record(index, row, &mut date_issues);
                let status = classify(record.dhl_number.as_deref(), record.eta, today);
                let billing_overdue =
                    is_billing_overdue(record.invoice_number.as_deref(), record.etd, today);
                let comment = record
                    .id
                    .as_deref()
                    .and_then(|id| store.get(id))
                    .unwrap_or_default()
                    .to_string();
                EnrichedRecord {
                    record,
                    status,
                    billing_overdue,
                    comment,
                    source: row.clone(),
                }
            })
            .collect();

        if !date_issues.is_empty() {
            tracing::warn!(
                "{} date cells could not be read and were treated as missing",
                date_issues.len()
            );
        }
        tracing::info!(
            "Enriched {} records against {}",
            records.len(),
            today.format("%Y-%m-%d")
        );

        Ok(EnrichedDataset {
            columns: dataset.columns().to_vec(),
            column_map: map.clone(),
            evaluation_date: today,
            records,
            date_issues,
        })
    }

    fn read_record(
        &self,
        index: usize,
        row: &Row,
        issues: &mut Vec<DateParseError>,
    ) -> ShipmentRecord {
        let map = &self.columns;
        let mut date = |column: &str| match coerce_cell(row.get(column), index, column) {
            Ok(date) => date,
            Err(issue) => {
                tracing::debug!("{}", issue);
                issues.push(issue);
                None
            }
        };
        let etd = date(map.etd.as_str());
        let eta = date(map.eta.as_str());

        ShipmentRecord {
            row_index: index,
            id: row.get(&map.id).canonical_text(),
            dhl_number: row.get(&map.dhl).canonical_text(),
            invoice_number: row.get(&map.invoice).canonical_text(),
            etd,
            eta,
            period: row.get(&map.period).canonical_text(),
            company: row.get(&map.company).canonical_text(),
        }
    }
}

/// Enrich with default column names.
///
/// # Errors
/// See [`Enricher::enrich`].
pub fn enrich(
    dataset: &Dataset,
    store: &CommentStore,
    evaluation_date: NaiveDate,
) -> Result<EnrichedDataset, SchemaError> {
    Enricher::new(evaluation_date).enrich(dataset, store)
}
