//! Commission report DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use domain_policy::{CommissionReport, ReportPeriod};

use super::policy::PolicySummary;

/// `?year=&month=`, also accepted as `?ano=&mes=`
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub ano: Option<String>,
    pub mes: Option<String>,
}

impl ReportQuery {
    /// The requested period, if both parts are present and numeric
    pub fn period(&self) -> Option<ReportPeriod> {
        let year = self.year.as_deref().or(self.ano.as_deref());
        let month = self.month.as_deref().or(self.mes.as_deref());
        ReportPeriod::from_query(year, month)
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub policies: Vec<PolicySummary>,
    pub total_commission: Option<Decimal>,
}

impl From<CommissionReport> for ReportResponse {
    fn from(report: CommissionReport) -> Self {
        Self {
            year: report.period.map(|p| p.year),
            month: report.period.map(|p| p.month),
            policies: report.policies.into_iter().map(PolicySummary::from).collect(),
            total_commission: report.total_commission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portuguese_aliases() {
        let query = ReportQuery {
            ano: Some("2022".to_string()),
            mes: Some("5".to_string()),
            ..Default::default()
        };
        assert_eq!(query.period(), Some(ReportPeriod::new(2022, 5)));
    }

    #[test]
    fn test_english_names_win() {
        let query = ReportQuery {
            year: Some("2023".to_string()),
            month: Some("1".to_string()),
            ano: Some("2022".to_string()),
            mes: Some("5".to_string()),
        };
        assert_eq!(query.period(), Some(ReportPeriod::new(2023, 1)));
    }

    #[test]
    fn test_one_sided_query_has_no_period() {
        let query = ReportQuery {
            year: Some("2022".to_string()),
            ..Default::default()
        };
        assert_eq!(query.period(), None);
    }
}
