//! Comment round-tripping across enrichment, edits and restarts

use expodoc_core::{
    annotations_from_enriched, annotations_from_table, reconcile, AnnotationSession, ColumnMap,
    CommentStore, DocumentaryStatus, MemoryBackend, ReconcileError, StoreBackend,
};
use expodoc_test_utils::{eval_date, mixed_upload, store_of, upload, ShipmentRow, TempStore};
use pretty_assertions::assert_eq;

#[test]
fn test_unedited_roundtrip_leaves_store_unchanged() {
    let original = store_of(&[("100", "note"), ("104", ""), ("999", "elsewhere")]);
    let mut store = original.clone();
    let backend = MemoryBackend::new();

    let enriched = expodoc_core::enrich(&mixed_upload(), &store, eval_date()).unwrap();
    let report = reconcile(annotations_from_enriched(&enriched), &mut store, &backend).unwrap();

    assert_eq!(store, original);
    assert!(!report.changed());
    assert_eq!(backend.saved(), Some(original));
}

#[test]
fn test_persistence_survives_restart() {
    let tmp = TempStore::new();
    tmp.backend().save(&store_of(&[("100", "note")])).unwrap();

    let reloaded = tmp.backend().load().unwrap();
    assert_eq!(reloaded, store_of(&[("100", "note")]));
}

#[test]
fn test_stale_identifier_is_retained() {
    let tmp = TempStore::new();
    tmp.backend()
        .save(&store_of(&[("200", "from last month")]))
        .unwrap();

    let mut session = AnnotationSession::open(tmp.backend()).unwrap();
    let mut enriched = session.enrich(&mixed_upload(), eval_date()).unwrap();
    enriched.set_comment("100", "docs sent to broker");
    session.reconcile(&enriched).unwrap();

    let on_disk = tmp.backend().load().unwrap();
    assert_eq!(on_disk.get("200"), Some("from last month"));
    assert_eq!(on_disk.get("100"), Some("docs sent to broker"));
}

#[test]
fn test_new_upload_inherits_comments_for_known_ids() {
    let tmp = TempStore::new();
    let mut session = AnnotationSession::open(tmp.backend()).unwrap();
    let mut first = session.enrich(&mixed_upload(), eval_date()).unwrap();
    first.set_comment("102", "escalated");
    session.reconcile(&first).unwrap();
    drop(session);

    let next_upload = upload([
        ShipmentRow::new(102.0).eta_in(3),
        ShipmentRow::new(500_i64).eta_in(30),
    ]);
    let session = AnnotationSession::open(tmp.backend()).unwrap();
    let second = session.enrich(&next_upload, eval_date()).unwrap();
    assert_eq!(second.find("102").unwrap().comment, "escalated");
    assert_eq!(second.find("500").unwrap().comment, "");
}

#[test]
fn test_blank_edit_clears_comment() {
    let tmp = TempStore::new();
    tmp.backend().save(&store_of(&[("101", "old")])).unwrap();

    let mut session = AnnotationSession::open(tmp.backend()).unwrap();
    let mut enriched = session.enrich(&mixed_upload(), eval_date()).unwrap();
    assert_eq!(enriched.find("101").unwrap().comment, "old");
    enriched.set_comment("101", "");
    let report = session.reconcile(&enriched).unwrap();

    assert_eq!(report.cleared, 1);
    assert_eq!(tmp.backend().load().unwrap().get("101"), Some(""));
}

#[test]
fn test_failed_save_keeps_previous_file_and_session_edits() {
    let tmp = TempStore::new();
    tmp.backend().save(&store_of(&[("100", "v1")])).unwrap();
    let before = std::fs::read_to_string(tmp.path()).unwrap();

    // A directory squatting on the temp path makes the write step fail.
    let squatter = tmp
        .dir()
        .join(format!(".comentarios.json.tmp.{}", std::process::id()));
    std::fs::create_dir(&squatter).unwrap();

    let mut session = AnnotationSession::open(tmp.backend()).unwrap();
    let mut enriched = session.enrich(&mixed_upload(), eval_date()).unwrap();
    enriched.set_comment("100", "v2");
    let err = session.reconcile(&enriched).unwrap_err();

    assert!(matches!(err, ReconcileError::Persistence(_)));
    assert!(err.to_string().contains("this session only"));
    assert_eq!(session.store().get("100"), Some("v2"));
    assert_eq!(std::fs::read_to_string(tmp.path()).unwrap(), before);
}

#[test]
fn test_edited_table_reconciles_through_output_columns() {
    let mut store = CommentStore::new();
    let enriched = expodoc_core::enrich(&mixed_upload(), &store, eval_date()).unwrap();
    assert_eq!(enriched.find("103").unwrap().status, DocumentaryStatus::Dispatched);

    let mut table = enriched.to_dataset();
    let mut rows: Vec<_> = table.rows().to_vec();
    rows[0].set("Comentarios", "edited in sheet");
    table = expodoc_core::Dataset::new(table.columns().to_vec());
    for row in rows {
        table.push(row);
    }

    let annotations = annotations_from_table(&table, &ColumnMap::default()).unwrap();
    let report = reconcile(annotations, &mut store, &MemoryBackend::new()).unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(store.get("100"), Some("edited in sheet"));
    assert_eq!(store.len(), 1);
}
