//! Billing lateness
//!
//! An invoice is due within a grace period after the estimated departure.

use crate::dates::days_between;
use chrono::NaiveDate;

/// Days after ETD before a missing invoice counts as overdue.
pub const INVOICE_GRACE_DAYS: i64 = 4;

/// True when no invoice number is recorded and more than
/// [`INVOICE_GRACE_DAYS`] days have passed since `etd`.
///
/// A missing `etd` never counts as overdue.
#[must_use]
pub fn is_billing_overdue(
    invoice_number: Option<&str>,
    etd: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    let invoiced = invoice_number.is_some_and(|s| !s.trim().is_empty());
    if invoiced {
        return false;
    }
    etd.is_some_and(|etd| days_between(etd, today) > INVOICE_GRACE_DAYS)
}
