//! Record filters
//!
//! Each facet is an any-of set; an empty set leaves that facet
//! unconstrained. Facets combine with AND. Records lacking a value for a
//! constrained facet never match it.

use crate::enrich::{EnrichedDataset, EnrichedRecord};
use crate::status::DocumentaryStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Facet selection over enriched records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordFilter {
    pub periods: BTreeSet<String>,
    pub companies: BTreeSet<String>,
    pub statuses: BTreeSet<DocumentaryStatus>,
    pub etd_dates: BTreeSet<NaiveDate>,
    pub eta_dates: BTreeSet<NaiveDate>,
}

fn allows<T: Ord>(set: &BTreeSet<T>, value: Option<&T>) -> bool {
    set.is_empty() || value.is_some_and(|v| set.contains(v))
}

impl RecordFilter {
    /// Filter that matches everything
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a period
    #[must_use]
    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.periods.insert(period.into());
        self
    }

    /// Add a company
    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.companies.insert(company.into());
        self
    }

    /// Add a status
    #[must_use]
    pub fn with_status(mut self, status: DocumentaryStatus) -> Self {
        self.statuses.insert(status);
        self
    }

    /// Add an ETD date
    #[must_use]
    pub fn with_etd(mut self, date: NaiveDate) -> Self {
        self.etd_dates.insert(date);
        self
    }

    /// Add an ETA date
    #[must_use]
    pub fn with_eta(mut self, date: NaiveDate) -> Self {
        self.eta_dates.insert(date);
        self
    }

    /// True when no facet is constrained
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
            && self.companies.is_empty()
            && self.statuses.is_empty()
            && self.etd_dates.is_empty()
            && self.eta_dates.is_empty()
    }

    /// Check one record
    #[must_use]
    pub fn matches(&self, enriched: &EnrichedRecord) -> bool {
        let r = &enriched.record;
        allows(&self.periods, r.period.as_ref())
            && allows(&self.companies, r.company.as_ref())
            && allows(&self.statuses, Some(&enriched.status))
            && allows(&self.etd_dates, r.etd.as_ref())
            && allows(&self.eta_dates, r.eta.as_ref())
    }

    /// Keep matching records
    #[must_use]
    pub fn apply(&self, dataset: EnrichedDataset) -> EnrichedDataset {
        if self.is_empty() {
            return dataset;
        }
        let before = dataset.len();
        let filtered = dataset.retain(|r| self.matches(r));
        tracing::debug!("Filter kept {} of {} records", filtered.len(), before);
        filtered
    }
}

/// Distinct values available for each facet, sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub periods: Vec<String>,
    pub companies: Vec<String>,
    pub statuses: Vec<DocumentaryStatus>,
}

impl FilterOptions {
    /// Collect facet values present in `dataset`
    #[must_use]
    pub fn from_dataset(dataset: &EnrichedDataset) -> Self {
        let mut periods = BTreeSet::new();
        let mut companies = BTreeSet::new();
        let mut statuses = BTreeSet::new();
        for enriched in dataset.records() {
            if let Some(p) = &enriched.record.period {
                periods.insert(p.clone());
            }
            if let Some(c) = &enriched.record.company {
                companies.insert(c.clone());
            }
            statuses.insert(enriched.status);
        }
        Self {
            periods: periods.into_iter().collect(),
            companies: companies.into_iter().collect(),
            statuses: statuses.into_iter().collect(),
        }
    }
}
