//! Annotation reconciliation
//!
//! After the presentation layer hands back an edited dataset, every
//! (identifier, comment) pair is written into the [`CommentStore`] and the
//! whole store is persisted. Identifiers that no longer appear in the edited
//! rows keep their stored comments.

use crate::config::ColumnMap;
use crate::enrich::EnrichedDataset;
use crate::error::{ReconcileError, SchemaError};
use crate::store::{CommentStore, StoreBackend};
use crate::table::{Cell, Dataset};
use serde::Serialize;

/// Comment value for one edited row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Canonical identifier; rows without one cannot be reconciled
    pub id: Option<String>,
    pub comment: String,
}

impl Annotation {
    /// Annotation for a known identifier
    pub fn new(id: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            comment: comment.into(),
        }
    }
}

/// Outcome counters of one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Annotations examined
    pub seen: usize,
    /// New identifiers written with a non-blank comment
    pub inserted: usize,
    /// Existing comments replaced with different text
    pub updated: usize,
    /// Existing comments replaced with an empty one
    pub cleared: usize,
    /// Annotations that left the store as it was
    pub unchanged: usize,
    /// Rows skipped for lack of an identifier
    pub skipped_without_id: usize,
    /// Store size after reconciliation
    pub store_size: usize,
}

impl ReconcileReport {
    /// Whether any stored comment changed
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.inserted + self.updated + self.cleared > 0
    }
}

/// Annotations carried by an enriched (and possibly edited) dataset
#[must_use]
pub fn annotations_from_enriched(dataset: &EnrichedDataset) -> Vec<Annotation> {
    dataset
        .records()
        .iter()
        .map(|r| Annotation {
            id: r.record.id.clone(),
            comment: r.comment.clone(),
        })
        .collect()
}

/// Annotations read from an edited plain table.
///
/// # Errors
/// Returns [`SchemaError`] if the identifier or comment column is absent.
pub fn annotations_from_table(
    table: &Dataset,
    columns: &ColumnMap,
) -> Result<Vec<Annotation>, SchemaError> {
    for required in [&columns.id, &columns.comment] {
        if !table.has_column(required) {
            return Err(SchemaError::missing_column(required.as_str()));
        }
    }
    Ok(table
        .rows()
        .iter()
        .map(|row| Annotation {
            id: row.get(&columns.id).canonical_text(),
            comment: match row.get(&columns.comment) {
                Cell::Empty => String::new(),
                other => other.to_string(),
            },
        })
        .collect())
}

/// Apply annotations to `store` in memory, without persisting.
///
/// Later annotations for the same identifier win. A blank comment for an
/// identifier the store has never seen is not recorded.
pub fn apply_annotations<I>(annotations: I, store: &mut CommentStore) -> ReconcileReport
where
    I: IntoIterator<Item = Annotation>,
{
    let mut report = ReconcileReport::default();
    for Annotation { id, comment } in annotations {
        report.seen += 1;
        let Some(id) = id else {
            report.skipped_without_id += 1;
            continue;
        };
        let (known, same) = match store.get(&id) {
            Some(previous) => (true, previous == comment),
            None => (false, false),
        };
        if same || (!known && comment.trim().is_empty()) {
            report.unchanged += 1;
            continue;
        }
        if !known {
            report.inserted += 1;
        } else if comment.is_empty() {
            report.cleared += 1;
        } else {
            report.updated += 1;
        }
        store.insert(id, comment);
    }
    report.store_size = store.len();
    report
}

/// Apply annotations to `store` and persist the whole store through `backend`.
///
/// # Errors
/// Returns [`ReconcileError::Persistence`] if the backend could not write.
/// `store` already holds the applied annotations in that case.
pub fn reconcile<I>(
    annotations: I,
    store: &mut CommentStore,
    backend: &dyn StoreBackend,
) -> Result<ReconcileReport, ReconcileError>
where
    I: IntoIterator<Item = Annotation>,
{
    let report = apply_annotations(annotations, store);
    if report.skipped_without_id > 0 {
        tracing::warn!(
            "{} edited rows have no identifier and were not reconciled",
            report.skipped_without_id
        );
    }

    if let Err(e) = backend.save(store) {
        tracing::error!(
            "Comment store {} not saved, comments kept in memory only: {}",
            backend.location(),
            e
        );
        return Err(e.into());
    }

    tracing::info!(
        "Reconciled {} rows ({} new, {} updated, {} cleared), {} comments in {}",
        report.seen,
        report.inserted,
        report.updated,
        report.cleared,
        report.store_size,
        backend.location()
    );
    Ok(report)
}
