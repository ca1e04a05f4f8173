//! Reading uploads from disk and writing enriched tables back out

use expodoc_core::{
    annotations_from_table, enrich, reconcile, Cell, ColumnMap, CommentStore, MemoryBackend,
};
use expodoc_table::{read_table, write_table, ReadOptions, TableError, TableFormat};
use expodoc_test_utils::{eval_date, mixed_upload, store_of};
use pretty_assertions::assert_eq;
use std::fs;

#[test]
fn test_csv_upload_enriches_like_in_memory_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.csv");
    write_table(&mixed_upload(), &path, TableFormat::Csv).unwrap();

    let from_disk = read_table(&path, &ReadOptions::new()).unwrap();
    assert_eq!(from_disk.columns(), mixed_upload().columns());
    assert_eq!(from_disk.rows()[0].get("Doc Entry SAP"), &Cell::Int(100));

    let store = store_of(&[("101", "call broker")]);
    let expected = enrich(&mixed_upload(), &store, eval_date()).unwrap();
    let actual = enrich(&from_disk, &store, eval_date()).unwrap();
    let statuses = |ds: &expodoc_core::EnrichedDataset| {
        ds.records()
            .iter()
            .map(|r| (r.record.id.clone(), r.status, r.billing_overdue, r.comment.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(statuses(&actual), statuses(&expected));
    assert!(actual.date_issues().is_empty());
}

#[test]
fn test_json_upload_reads_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.json");
    fs::write(
        &path,
        r#"[
            {"Doc Entry SAP": 100, "DHL #": "", "ETD": "2024-05-20", "ETA": "2024-06-03"},
            {"Doc Entry SAP": "101", "DHL #": "JD1", "ETD": null, "ETA": null}
        ]"#,
    )
    .unwrap();

    let ds = read_table(&path, &ReadOptions::new()).unwrap();
    assert_eq!(ds.columns(), ["Doc Entry SAP", "DHL #", "ETD", "ETA"]);

    let enriched = enrich(&ds, &CommentStore::new(), eval_date()).unwrap();
    assert!(enriched.find("100").unwrap().billing_overdue);
    assert_eq!(enriched.find("101").unwrap().status.code(), "DISPATCHED");
}

#[test]
fn test_edited_csv_reconciles_into_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.csv");
    fs::write(
        &path,
        "Doc Entry SAP,Estado Documental,Comentarios\n\
         100.0,Crítico,waiting on origin cert\n\
         101,Alerta,\n",
    )
    .unwrap();

    let table = read_table(&path, &ReadOptions::new()).unwrap();
    let annotations = annotations_from_table(&table, &ColumnMap::default()).unwrap();
    let mut store = store_of(&[("101", "old")]);
    let report = reconcile(annotations, &mut store, &MemoryBackend::new()).unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.cleared, 1);
    assert_eq!(store.get("100"), Some("waiting on origin cert"));
    assert_eq!(store.get("101"), Some(""));
}

#[test]
fn test_unedited_export_reconciles_without_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("enriched.csv");
    let original = store_of(&[("100", "007"), ("101", "3.10"), ("102", "1e5"), ("103", "00123")]);

    let enriched = enrich(&mixed_upload(), &original, eval_date()).unwrap();
    write_table(&enriched.to_dataset(), &path, TableFormat::Csv).unwrap();

    let table = read_table(&path, &ReadOptions::new()).unwrap();
    let annotations = annotations_from_table(&table, &ColumnMap::default()).unwrap();
    let mut store = original.clone();
    let report = reconcile(annotations, &mut store, &MemoryBackend::new()).unwrap();

    assert!(!report.changed(), "{report:?}");
    assert_eq!(report.unchanged, 5);
    assert_eq!(store, original);
}

#[test]
fn test_numeric_looking_comments_are_stored_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.csv");
    fs::write(&path, "Doc Entry SAP,Comentarios\n100,007\n101,3.10\n102,1e5\n").unwrap();

    let table = read_table(&path, &ReadOptions::new()).unwrap();
    let annotations = annotations_from_table(&table, &ColumnMap::default()).unwrap();
    let mut store = CommentStore::new();
    let report = reconcile(annotations, &mut store, &MemoryBackend::new()).unwrap();

    assert_eq!(report.inserted, 3);
    assert_eq!(store, store_of(&[("100", "007"), ("101", "3.10"), ("102", "1e5")]));
}

#[test]
fn test_unsupported_and_malformed_inputs() {
    let dir = tempfile::tempdir().unwrap();

    let txt = dir.path().join("upload.txt");
    fs::write(&txt, "hello").unwrap();
    assert!(matches!(
        read_table(&txt, &ReadOptions::new()),
        Err(TableError::UnsupportedFormat { .. })
    ));

    let json = dir.path().join("upload.json");
    fs::write(&json, "{\"not\": \"rows\"}").unwrap();
    assert!(matches!(
        read_table(&json, &ReadOptions::new()),
        Err(TableError::Shape { .. })
    ));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "[{").unwrap();
    assert!(matches!(
        read_table(&broken, &ReadOptions::new()),
        Err(TableError::Json { .. })
    ));

    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        read_table(&missing, &ReadOptions::new()),
        Err(TableError::Io { .. })
    ));
}
