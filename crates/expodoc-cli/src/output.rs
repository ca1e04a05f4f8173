//! Text and JSON renderings of command results

use chrono::NaiveDate;
use expodoc_core::{CommentStore, DocumentaryStatus, FilterOptions, ReconcileReport, Report};
use serde::Serialize;
use std::io::{self, Write};

/// `summary --json` payload
#[derive(Debug, Serialize)]
pub struct SummaryOutput<'a> {
    pub evaluation_date: NaiveDate,
    pub report: &'a Report,
    /// Facet values present before filtering
    pub filter_options: &'a FilterOptions,
    pub unreadable_dates: usize,
}

const WIDTH: usize = 24;

/// Headline counts, then records per status and per period
///
/// # Errors
/// Returns error if the sink fails
pub fn render_summary(
    report: &Report,
    today: NaiveDate,
    unreadable_dates: usize,
    out: &mut dyn Write,
) -> io::Result<()> {
    let s = &report.summary;
    writeln!(out, "Documentary status as of {today}")?;
    for (label, count) in [
        ("Total references", s.total),
        ("Documents dispatched", s.dispatched),
        ("On time", s.on_time),
        ("At risk", s.at_risk),
        ("Critical", s.critical),
        ("Billing overdue", s.billing_overdue),
    ] {
        writeln!(out, "  {label:<WIDTH$}{count:>5}")?;
    }

    writeln!(out)?;
    writeln!(out, "By status")?;
    for (status, count) in &report.by_status {
        writeln!(out, "  {:<WIDTH$}{count:>5}", status.label())?;
    }

    writeln!(out)?;
    writeln!(out, "By period")?;
    for (period, by_status) in &report.by_period.periods {
        let total: usize = by_status.values().sum();
        writeln!(out, "  {period:<WIDTH$}{total:>5}  ({})", breakdown(by_status.iter()))?;
    }
    if report.by_period.without_period > 0 {
        writeln!(
            out,
            "  {:<WIDTH$}{:>5}",
            "(no period)", report.by_period.without_period
        )?;
    }

    if unreadable_dates > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "{unreadable_dates} date values could not be read and were treated as missing"
        )?;
    }
    Ok(())
}

fn breakdown<'a>(counts: impl Iterator<Item = (&'a DocumentaryStatus, &'a usize)>) -> String {
    counts
        .map(|(status, count)| format!("{} {count}", status.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a reconciliation
///
/// # Errors
/// Returns error if the sink fails
pub fn render_reconcile(report: &ReconcileReport, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "Reconciled {} rows: {} inserted, {} updated, {} cleared, {} unchanged",
        report.seen, report.inserted, report.updated, report.cleared, report.unchanged
    )?;
    if report.skipped_without_id > 0 {
        writeln!(out, "Skipped {} rows without identifier", report.skipped_without_id)?;
    }
    writeln!(out, "Store holds {} comments", report.store_size)
}

/// Stored comments, one `id<TAB>comment` line each
///
/// # Errors
/// Returns error if the sink fails
pub fn render_store(store: &CommentStore, location: &str, out: &mut dyn Write) -> io::Result<()> {
    for (id, comment) in store {
        writeln!(out, "{id}\t{comment}")?;
    }
    writeln!(out, "{} comments in {location}", store.len())
}
