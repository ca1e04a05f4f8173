//! End-to-end runs of the subcommands against files on disk

use expodoc_cli::{build_cli, run, Context};
use expodoc_table::{write_table, TableFormat};
use expodoc_test_utils::{mixed_upload, upload, ShipmentRow};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        write_table(&mixed_upload(), ws.path("upload.csv"), TableFormat::Csv).unwrap();
        ws
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let store = self.arg("comentarios.json");
        let mut argv = vec!["expodoc", "--store", store.as_str(), "--today", "2024-06-01"];
        argv.extend_from_slice(args);
        let matches = build_cli().try_get_matches_from(argv)?;
        let (name, sub) = matches.subcommand().unwrap();
        let context = Context::from_args(sub)?;
        let mut out = Vec::new();
        run(&context, name, sub, &mut out)?;
        Ok(String::from_utf8(out)?)
    }
}

#[test]
fn test_summary_counts_every_status() {
    let ws = Workspace::new();
    let out = ws.run(&["summary", &ws.arg("upload.csv"), "--json"]).unwrap();
    let value: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["evaluation_date"], "2024-06-01");
    let summary = &value["report"]["summary"];
    assert_eq!(summary["total"], 5);
    assert_eq!(summary["dispatched"], 1);
    assert_eq!(summary["on_time"], 1);
    assert_eq!(summary["at_risk"], 1);
    assert_eq!(summary["critical"], 2);
    assert_eq!(summary["billing_overdue"], 1);
    assert_eq!(value["report"]["by_period"]["periods"]["2024-05"]["AT_RISK"], 1);
    assert_eq!(value["filter_options"]["companies"], serde_json::json!(["ACME", "Globex"]));
}

#[test]
fn test_summary_text_and_filters() {
    let ws = Workspace::new();
    let out = ws
        .run(&["summary", &ws.arg("upload.csv"), "--status", "critical", "--status", "Alerta"])
        .unwrap();

    assert!(out.starts_with("Documentary status as of 2024-06-01\n"));
    let total = out
        .lines()
        .find(|l| l.trim_start().starts_with("Total references"))
        .unwrap();
    assert!(total.trim_end().ends_with(" 3"), "{total}");
    assert!(out.contains("(Alerta 1)"));
    assert!(!out.contains("Documentos Despachados"));
}

#[test]
fn test_enrich_writes_filtered_json_file() {
    let ws = Workspace::new();
    let out = ws
        .run(&[
            "enrich",
            &ws.arg("upload.csv"),
            "--company",
            "Globex",
            "--output",
            &ws.arg("enriched.json"),
        ])
        .unwrap();
    assert!(out.starts_with("Wrote 1 rows"));

    let written = fs::read_to_string(ws.path("enriched.json")).unwrap();
    let rows: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["Doc Entry SAP"], 103);
    assert_eq!(rows[0]["Estado Documental"], "Documentos Despachados");
    assert_eq!(rows[0]["Fuera Plazo Facturación"], false);
    assert_eq!(rows[0]["Comentarios"], "");
}

#[test]
fn test_annotate_then_enrich_shows_comment() {
    let ws = Workspace::new();
    let out = ws
        .run(&["annotate", &ws.arg("upload.csv"), "--id", "102", "--comment", "docs at broker"])
        .unwrap();
    assert!(out.contains("1 inserted"));

    let stored = ws.run(&["show-store", "--json"]).unwrap();
    let value: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(value, serde_json::json!({"102": "docs at broker"}));

    let csv = ws.run(&["enrich", &ws.arg("upload.csv"), "--format", "csv"]).unwrap();
    let line = csv.lines().find(|l| l.starts_with("102,")).unwrap();
    assert!(line.ends_with(",Crítico,true,docs at broker"), "{line}");
}

#[test]
fn test_annotate_unknown_identifier_fails_without_saving() {
    let ws = Workspace::new();
    let err = ws
        .run(&["annotate", &ws.arg("upload.csv"), "--id", "999", "--comment", "x"])
        .unwrap_err();
    assert!(format!("{err:#}").contains("no shipment with identifier 999"));
    assert!(!ws.path("comentarios.json").exists());
}

#[test]
fn test_reconcile_edited_table() {
    let ws = Workspace::new();
    ws.run(&["annotate", &ws.arg("upload.csv"), "--id", "100", "--comment", "first"])
        .unwrap();
    fs::write(
        ws.path("edited.csv"),
        "Doc Entry SAP,Comentarios\n100,\n101,check certificate\n,orphan\n",
    )
    .unwrap();

    let out = ws.run(&["reconcile", &ws.arg("edited.csv")]).unwrap();
    assert!(out.contains("1 inserted, 0 updated, 1 cleared"), "{out}");
    assert!(out.contains("Skipped 1 rows without identifier"));

    let listing = ws.run(&["show-store"]).unwrap();
    assert_eq!(
        listing,
        format!(
            "100\t\n101\tcheck certificate\n2 comments in {}\n",
            ws.arg("comentarios.json")
        )
    );
}

#[test]
fn test_missing_required_column_is_named() {
    let ws = Workspace::new();
    fs::write(ws.path("bad.csv"), "Doc Entry SAP,ETD\n100,2024-06-01\n").unwrap();
    let err = ws.run(&["summary", &ws.arg("bad.csv")]).unwrap_err();
    assert!(format!("{err:#}").contains("required column missing: 'ETA'"));
}

#[test]
fn test_corrupt_store_is_not_replaced() {
    let ws = Workspace::new();
    fs::write(ws.path("comentarios.json"), "not json").unwrap();

    let err = ws
        .run(&["annotate", &ws.arg("upload.csv"), "--id", "100", "--comment", "x"])
        .unwrap_err();
    assert!(format!("{err:#}").contains("cannot open comment store"));
    assert_eq!(fs::read_to_string(ws.path("comentarios.json")).unwrap(), "not json");
}

#[test]
fn test_unreadable_dates_are_reported_not_fatal() {
    let ws = Workspace::new();
    let table = upload([
        ShipmentRow::new(1_i64).eta("sometime"),
        ShipmentRow::new(2_i64).eta_in(20),
    ]);
    write_table(&table, ws.path("dates.csv"), TableFormat::Csv).unwrap();

    let out = ws.run(&["summary", &ws.arg("dates.csv")]).unwrap();
    assert!(out.contains("1 date values could not be read"));
}
