//! Documentary status classification
//!
//! A shipment is either dispatched (a courier tracking number exists) or
//! graded by how many days remain until its estimated arrival.

use crate::dates::days_between;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// More than this many days to ETA is on time.
pub const ON_TIME_AFTER_DAYS: i64 = 16;

/// Inclusive day window that raises an alert.
pub const AT_RISK_WINDOW: (i64, i64) = (11, 15);

/// Documentary state of one shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentaryStatus {
    /// Documents sent with the courier
    Dispatched,
    /// Plenty of time before arrival
    OnTime,
    /// Arrival is close
    AtRisk,
    /// Arrival is imminent, past, or unknown
    Critical,
}

impl DocumentaryStatus {
    /// All statuses in display order
    pub const ALL: [Self; 4] = [Self::Dispatched, Self::OnTime, Self::AtRisk, Self::Critical];

    /// Stable machine code
    #[inline]
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Dispatched => "DISPATCHED",
            Self::OnTime => "ON_TIME",
            Self::AtRisk => "AT_RISK",
            Self::Critical => "CRITICAL",
        }
    }

    /// Label shown in the `Estado Documental` column
    #[inline]
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dispatched => "Documentos Despachados",
            Self::OnTime => "A Tiempo",
            Self::AtRisk => "Alerta",
            Self::Critical => "Crítico",
        }
    }
}

impl fmt::Display for DocumentaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Unknown status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown documentary status: '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for DocumentaryStatus {
    type Err = UnknownStatus;

    /// Accepts codes (any case, `-` or `_`) and column labels (any case)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = trimmed.to_uppercase().replace('-', "_");
        let lowered = trimmed.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.code() == normalized || status.label().to_lowercase() == lowered)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Classify one shipment.
///
/// A non-blank `dhl_number` wins over any date. Otherwise the signed day
/// count to `eta` decides: above 16 is on time, 11 to 15 is at risk, and
/// everything else (including exactly 16, past dates and a missing ETA) is
/// critical.
#[must_use]
pub fn classify(
    dhl_number: Option<&str>,
    eta: Option<NaiveDate>,
    today: NaiveDate,
) -> DocumentaryStatus {
    if dhl_number.is_some_and(|s| !s.trim().is_empty()) {
        return DocumentaryStatus::Dispatched;
    }
    let Some(eta) = eta else {
        return DocumentaryStatus::Critical;
    };
    let days_to_eta = days_between(today, eta);
    if days_to_eta > ON_TIME_AFTER_DAYS {
        DocumentaryStatus::OnTime
    } else if (AT_RISK_WINDOW.0..=AT_RISK_WINDOW.1).contains(&days_to_eta) {
        DocumentaryStatus::AtRisk
    } else {
        DocumentaryStatus::Critical
    }
}
