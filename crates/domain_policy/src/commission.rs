//! Monthly commission report
//!
//! The report lists every policy whose effective date falls in a given
//! calendar month and totals the broker's commission on them. With no period
//! selected the report is empty and carries no total, which is different from
//! a period whose policies add up to zero.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::Policy;

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Builds a period from raw query values
    ///
    /// Both values must be present and numeric; otherwise there is no period.
    /// A numeric month outside 1-12 still yields a period, one that matches
    /// nothing.
    pub fn from_query(year: Option<&str>, month: Option<&str>) -> Option<Self> {
        let year = year?.trim().parse().ok()?;
        let month = month?.trim().parse().ok()?;
        Some(Self { year, month })
    }

    /// Returns true if `date` falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// First day of the month and first day of the following month
    ///
    /// `None` when the period is not a real calendar month.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let end = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)?
        };
        Some((start, end))
    }
}

/// Commission report for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionReport {
    pub period: Option<ReportPeriod>,
    /// Matching policies, ordered by effective date then code
    pub policies: Vec<Policy>,
    /// Sum of commissions; `None` when no policy matched
    pub total_commission: Option<Decimal>,
}

impl CommissionReport {
    /// The view shown before a period is chosen
    pub fn empty() -> Self {
        Self {
            period: None,
            policies: Vec::new(),
            total_commission: None,
        }
    }

    /// Builds the report for `period` from its matching policies
    pub fn build(period: ReportPeriod, mut policies: Vec<Policy>) -> Self {
        policies.sort_by(|a, b| {
            a.effective_date
                .cmp(&b.effective_date)
                .then_with(|| a.code.cmp(&b.code))
        });
        let total_commission = if policies.is_empty() {
            None
        } else {
            Some(policies.iter().map(Policy::total_commission).sum())
        };
        Self {
            period: Some(period),
            policies,
            total_commission,
        }
    }

    /// Number of policies in the report
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
