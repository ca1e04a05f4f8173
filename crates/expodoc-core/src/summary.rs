//! KPI counts and distributions
//!
//! The numbers behind the report's headline metrics and its two charts
//! (records per status, records per period split by status).

use crate::enrich::EnrichedRecord;
use crate::status::DocumentaryStatus;
use serde::Serialize;
use std::collections::BTreeMap;

/// Headline counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Total references
    pub total: usize,
    pub dispatched: usize,
    pub on_time: usize,
    pub at_risk: usize,
    pub critical: usize,
    /// Records flagged as billing overdue
    pub billing_overdue: usize,
}

impl Summary {
    /// Count over records
    #[must_use]
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        records.iter().fold(Self::default(), |mut s, r| {
            s.total += 1;
            match r.status {
                DocumentaryStatus::Dispatched => s.dispatched += 1,
                DocumentaryStatus::OnTime => s.on_time += 1,
                DocumentaryStatus::AtRisk => s.at_risk += 1,
                DocumentaryStatus::Critical => s.critical += 1,
            }
            if r.billing_overdue {
                s.billing_overdue += 1;
            }
            s
        })
    }

    /// Count for one status
    #[must_use]
    pub fn count(&self, status: DocumentaryStatus) -> usize {
        match status {
            DocumentaryStatus::Dispatched => self.dispatched,
            DocumentaryStatus::OnTime => self.on_time,
            DocumentaryStatus::AtRisk => self.at_risk,
            DocumentaryStatus::Critical => self.critical,
        }
    }
}

/// Records per status, only statuses that occur
pub type StatusDistribution = BTreeMap<DocumentaryStatus, usize>;

/// Records per status for every status present in `records`
#[must_use]
pub fn status_distribution(records: &[EnrichedRecord]) -> StatusDistribution {
    let mut counts = StatusDistribution::new();
    for r in records {
        *counts.entry(r.status).or_default() += 1;
    }
    counts
}

/// Records per period, split by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodDistribution {
    /// Period → status → count, periods sorted
    pub periods: BTreeMap<String, StatusDistribution>,
    /// Records with no period value (not charted)
    pub without_period: usize,
}

impl PeriodDistribution {
    /// Bucket records by period
    #[must_use]
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let mut dist = Self::default();
        for r in records {
            match &r.record.period {
                Some(period) => {
                    *dist
                        .periods
                        .entry(period.clone())
                        .or_default()
                        .entry(r.status)
                        .or_default() += 1;
                }
                None => dist.without_period += 1,
            }
        }
        dist
    }

    /// Total records in one period
    #[must_use]
    pub fn period_total(&self, period: &str) -> usize {
        self.periods
            .get(period)
            .map_or(0, |by_status| by_status.values().sum())
    }
}

/// Everything a report view needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub by_status: StatusDistribution,
    pub by_period: PeriodDistribution,
}

impl Report {
    /// Build all aggregates in one pass over `records`
    #[must_use]
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        Self {
            summary: Summary::from_records(records),
            by_status: status_distribution(records),
            by_period: PeriodDistribution::from_records(records),
        }
    }
}
