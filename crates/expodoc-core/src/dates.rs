//! Date coercion for shipment columns
//!
//! Spreadsheets deliver dates as native date cells, serial day numbers or
//! free text in whatever format the operator typed. Everything funnels into
//! a [`NaiveDate`]; anything unreadable is reported and treated as missing.

use crate::error::DateParseError;
use crate::table::Cell;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Date-only text formats, tried in order.
///
/// Slash dates are read month-first, then day-first when the month-first
/// reading is impossible (e.g. `25/03/2024`).
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m-%d-%y",
    "%d-%m-%y",
    "%d.%m.%y",
];

/// Date-time text formats; the time part is dropped.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%m/%d/%y %H:%M:%S",
    "%d/%m/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%d/%m/%y %H:%M",
];

/// Years outside this range are misreadings, e.g. `%Y` swallowing the
/// two-digit year of `6/20/24` as year 24.
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Largest serial day number a workbook can hold (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Convert a spreadsheet serial day number to a date.
///
/// Uses the 1900 date system with the customary 1899-12-30 epoch, which
/// absorbs the fictitious 1900-02-29.
#[must_use]
pub fn from_serial_day(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL_DAY {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    #[allow(clippy::cast_possible_truncation)]
    let days = serial.trunc() as i64;
    epoch.checked_add_signed(Duration::days(days))
}

/// Parse free text into a date.
///
/// Candidates with an implausible year are skipped, so a two-digit year
/// falls through to the `%y` formats instead of landing in year 24.
#[must_use]
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let dates = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok());
    let datetimes = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date());
    let zoned = DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .map(|dt| dt.date_naive());

    dates
        .chain(datetimes)
        .chain(zoned)
        .find(|date| PLAUSIBLE_YEARS.contains(&date.year()))
}

/// Coerce one cell to an optional date.
///
/// Blank cells are simply missing. Non-blank cells that cannot be read
/// yield a [`DateParseError`] describing the cell; callers record it and
/// carry on with a missing date.
pub fn coerce_cell(
    cell: &Cell,
    row: usize,
    column: &str,
) -> Result<Option<NaiveDate>, DateParseError> {
    let parsed = match cell {
        Cell::Empty => return Ok(None),
        Cell::Text(s) if s.trim().is_empty() => return Ok(None),
        Cell::Float(f) if f.is_nan() => return Ok(None),
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => parse_date_text(s),
        #[allow(clippy::cast_precision_loss)]
        Cell::Int(n) => from_serial_day(*n as f64),
        Cell::Float(f) => from_serial_day(*f),
        Cell::Bool(_) => None,
    };
    parsed.map(Some).ok_or_else(|| DateParseError {
        row,
        column: column.to_string(),
        raw: cell.to_string(),
    })
}

/// Signed whole days from `from` to `to`.
#[inline]
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
