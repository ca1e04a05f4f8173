//! Testing utilities for Expodoc workspace
//!
//! Shared fixtures: shipment rows relative to a fixed evaluation date,
//! upload tables and throwaway comment store files.

#![allow(missing_docs)]

use chrono::{Duration, NaiveDate};
use expodoc_core::{Cell, CommentStore, Dataset, JsonFileBackend, Row};
use std::path::PathBuf;
use tempfile::TempDir;

/// Upload header in workbook order
pub const HEADER: [&str; 7] = [
    "Doc Entry SAP",
    "DHL #",
    "ETD",
    "ETA",
    "Invoice #",
    "Period",
    "Empresa",
];

/// Fixed evaluation date used across tests
pub fn eval_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// `eval_date() + days`
pub fn days_from_eval(days: i64) -> NaiveDate {
    eval_date() + Duration::days(days)
}

/// Builder for one shipment row
#[derive(Debug, Clone)]
pub struct ShipmentRow {
    id: Cell,
    dhl: Cell,
    etd: Cell,
    eta: Cell,
    invoice: Cell,
    period: Cell,
    company: Cell,
}

impl ShipmentRow {
    pub fn new(id: impl Into<Cell>) -> Self {
        Self {
            id: id.into(),
            dhl: Cell::Empty,
            etd: Cell::Date(eval_date()),
            eta: Cell::Date(days_from_eval(30)),
            invoice: Cell::Empty,
            period: Cell::text("2024-06"),
            company: Cell::text("ACME"),
        }
    }

    pub fn dhl(mut self, dhl: impl Into<Cell>) -> Self {
        self.dhl = dhl.into();
        self
    }

    pub fn invoice(mut self, invoice: impl Into<Cell>) -> Self {
        self.invoice = invoice.into();
        self
    }

    /// ETA `days` after the evaluation date
    pub fn eta_in(mut self, days: i64) -> Self {
        self.eta = Cell::Date(days_from_eval(days));
        self
    }

    /// ETD `days` before the evaluation date
    pub fn etd_ago(mut self, days: i64) -> Self {
        self.etd = Cell::Date(days_from_eval(-days));
        self
    }

    pub fn eta(mut self, eta: impl Into<Cell>) -> Self {
        self.eta = eta.into();
        self
    }

    pub fn etd(mut self, etd: impl Into<Cell>) -> Self {
        self.etd = etd.into();
        self
    }

    pub fn period(mut self, period: impl Into<Cell>) -> Self {
        self.period = period.into();
        self
    }

    pub fn company(mut self, company: impl Into<Cell>) -> Self {
        self.company = company.into();
        self
    }

    pub fn into_row(self) -> Row {
        HEADER
            .into_iter()
            .zip([
                self.id,
                self.dhl,
                self.etd,
                self.eta,
                self.invoice,
                self.period,
                self.company,
            ])
            .collect()
    }
}

/// Upload table with the full header
pub fn upload(rows: impl IntoIterator<Item = ShipmentRow>) -> Dataset {
    let mut ds = Dataset::new(HEADER);
    for row in rows {
        ds.push(row.into_row());
    }
    ds
}

/// A small mixed upload: one row per status plus an overdue invoice
pub fn mixed_upload() -> Dataset {
    upload([
        ShipmentRow::new(100_i64).eta_in(17),
        ShipmentRow::new(101_i64).eta_in(13).period("2024-05"),
        ShipmentRow::new(102_i64).eta_in(5).etd_ago(6),
        ShipmentRow::new(103_i64).dhl("JD123").eta_in(1).company("Globex"),
        ShipmentRow::new(104_i64).eta_in(-2).etd_ago(10).invoice("INV1"),
    ])
}

/// Store from literal pairs
pub fn store_of(pairs: &[(&str, &str)]) -> CommentStore {
    pairs.iter().copied().collect()
}

/// Temporary directory holding a comment store file
pub struct TempStore {
    dir: TempDir,
}

impl TempStore {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("comentarios.json")
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn backend(&self) -> JsonFileBackend {
        JsonFileBackend::new(self.path())
    }
}

impl Default for TempStore {
    fn default() -> Self {
        Self::new()
    }
}
