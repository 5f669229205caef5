//! Insured person DTOs

use chrono::NaiveDate;
use serde::Serialize;

use core_kernel::ChoiceCode;
use domain_insured::InsuredPerson;
use domain_policy::InsuredDetails;

use super::policy::PolicySummary;

#[derive(Debug, Serialize)]
pub struct InsuredResponse {
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub email: Option<String>,
    pub cpf: String,
    pub address: String,
    pub marital_status: &'static str,
    pub marital_status_label: &'static str,
    pub path: String,
}

impl From<InsuredPerson> for InsuredResponse {
    fn from(insured: InsuredPerson) -> Self {
        Self {
            id: insured.id.value(),
            path: insured.resource_path(),
            marital_status: insured.marital_status.code(),
            marital_status_label: insured.marital_status.label(),
            name: insured.name,
            birth_date: insured.birth_date,
            phone: insured.phone,
            email: insured.email,
            cpf: insured.cpf,
            address: insured.address,
        }
    }
}

/// An insured person with their policies
#[derive(Debug, Serialize)]
pub struct InsuredDetailsResponse {
    #[serde(flatten)]
    pub insured: InsuredResponse,
    pub policies: Vec<PolicySummary>,
}

impl From<InsuredDetails> for InsuredDetailsResponse {
    fn from(details: InsuredDetails) -> Self {
        Self {
            insured: details.insured.into(),
            policies: details.policies.into_iter().map(PolicySummary::from).collect(),
        }
    }
}
