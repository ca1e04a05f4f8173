//! Operator session
//!
//! Ties the comment store to its backend for the lifetime of one session:
//! load once, enrich uploads against it, reconcile edits back into it.

use crate::config::ColumnMap;
use crate::enrich::{EnrichedDataset, Enricher};
use crate::error::{ReconcileError, SchemaError, StoreLoadError};
use crate::reconcile::{annotations_from_enriched, reconcile, Annotation, ReconcileReport};
use crate::store::{CommentStore, StoreBackend};
use crate::table::Dataset;
use chrono::NaiveDate;

/// Comment store plus the backend it came from
pub struct AnnotationSession<B: StoreBackend> {
    backend: B,
    store: CommentStore,
    columns: ColumnMap,
}

impl<B: StoreBackend> std::fmt::Debug for AnnotationSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationSession")
            .field("backend", &self.backend.location())
            .field("comments", &self.store.len())
            .finish()
    }
}

impl<B: StoreBackend> AnnotationSession<B> {
    /// Load the store from `backend`
    ///
    /// # Errors
    /// Returns error if an existing durable store cannot be read
    pub fn open(backend: B) -> Result<Self, StoreLoadError> {
        let store = backend.load()?;
        tracing::info!(
            "Session opened with {} stored comments from {}",
            store.len(),
            backend.location()
        );
        Ok(Self {
            backend,
            store,
            columns: ColumnMap::default(),
        })
    }

    /// With custom column names
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }

    /// Current in-memory store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &CommentStore {
        &self.store
    }

    /// Backend
    #[inline]
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Enrich an upload against the session store
    ///
    /// # Errors
    /// Returns [`SchemaError`] if a required column is absent
    pub fn enrich(
        &self,
        dataset: &Dataset,
        evaluation_date: NaiveDate,
    ) -> Result<EnrichedDataset, SchemaError> {
        Enricher::new(evaluation_date)
            .with_columns(self.columns.clone())
            .enrich(dataset, &self.store)
    }

    /// Reconcile an edited enriched dataset and persist
    ///
    /// # Errors
    /// Returns error if the store could not be persisted; the session keeps
    /// the edits in memory.
    pub fn reconcile(
        &mut self,
        edited: &EnrichedDataset,
    ) -> Result<ReconcileReport, ReconcileError> {
        self.reconcile_annotations(annotations_from_enriched(edited))
    }

    /// Reconcile raw annotations and persist
    ///
    /// # Errors
    /// Returns error if the store could not be persisted
    pub fn reconcile_annotations<I>(
        &mut self,
        annotations: I,
    ) -> Result<ReconcileReport, ReconcileError>
    where
        I: IntoIterator<Item = Annotation>,
    {
        reconcile(annotations, &mut self.store, &self.backend)
    }

    /// Give up the session, returning the in-memory store
    #[must_use]
    pub fn into_store(self) -> CommentStore {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use crate::table::Cell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn upload() -> Dataset {
        let mut ds = Dataset::new(["Doc Entry SAP", "ETD", "ETA"]);
        ds.push_values([Cell::Int(100), Cell::Empty, Cell::Empty]);
        ds.push_values([Cell::Int(200), Cell::Empty, Cell::Empty]);
        ds
    }

    #[test]
    fn edit_cycle_persists_comment() {
        let mut session = AnnotationSession::open(MemoryBackend::new()).unwrap();
        let mut enriched = session.enrich(&upload(), today()).unwrap();
        enriched.set_comment("100", "note");
        let report = session.reconcile(&enriched).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(session.backend().saved().unwrap().get("100"), Some("note"));
    }

    #[test]
    fn reopened_session_sees_previous_comments() {
        let backend = MemoryBackend::with_store([("200", "hold")].into_iter().collect());
        let session = AnnotationSession::open(backend).unwrap();
        let enriched = session.enrich(&upload(), today()).unwrap();
        assert_eq!(enriched.find("200").unwrap().comment, "hold");
        assert_eq!(enriched.find("100").unwrap().comment, "");
    }
}
