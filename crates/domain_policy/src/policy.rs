//! Policy entity, insurers and the policy form
//!
//! A policy links one insured person to one vehicle. Its code is chosen by
//! the broker at registration and can never change afterwards.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use core_kernel::money::commission_on;
use core_kernel::{ChoiceCode, FieldErrors, FieldMap, FieldReader, InsuredId, PolicyCode, VehicleId};

use crate::vehicle::VehicleDraft;

/// Submitted field names for a policy
pub mod field {
    pub const CODE: &str = "codigo";
    pub const INSURER: &str = "seguradora";
    pub const EFFECTIVE_DATE: &str = "vigencia";
    pub const NET_PREMIUM: &str = "premio";
    pub const COMMISSION_PERCENTAGE: &str = "perc_comissao";
}

/// Insurance carriers the brokerage places policies with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Insurer {
    #[serde(rename = "BR")]
    Bradesco,
    #[serde(rename = "PS")]
    PortoSeguro,
    #[serde(rename = "AZ")]
    AzulSeguros,
    #[serde(rename = "MA")]
    Mapfre,
    #[serde(rename = "SA")]
    Santander,
    #[serde(rename = "TM")]
    TokioMarine,
    #[serde(rename = "AL")]
    Allianz,
}

impl Insurer {
    /// Carrier name as shown to brokers
    pub fn name(&self) -> &'static str {
        match self {
            Insurer::Bradesco => "Bradesco",
            Insurer::PortoSeguro => "Porto Seguro",
            Insurer::AzulSeguros => "Azul Seguros",
            Insurer::Mapfre => "Mapfre",
            Insurer::Santander => "Santander",
            Insurer::TokioMarine => "Tokio Marine",
            Insurer::Allianz => "Allianz",
        }
    }
}

impl ChoiceCode for Insurer {
    const ALL: &'static [Self] = &[
        Insurer::Bradesco,
        Insurer::PortoSeguro,
        Insurer::AzulSeguros,
        Insurer::Mapfre,
        Insurer::Santander,
        Insurer::TokioMarine,
        Insurer::Allianz,
    ];

    fn code(&self) -> &'static str {
        match self {
            Insurer::Bradesco => "BR",
            Insurer::PortoSeguro => "PS",
            Insurer::AzulSeguros => "AZ",
            Insurer::Mapfre => "MA",
            Insurer::Santander => "SA",
            Insurer::TokioMarine => "TM",
            Insurer::Allianz => "AL",
        }
    }
}

/// A stored policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub code: PolicyCode,
    pub insured_id: InsuredId,
    pub vehicle_id: VehicleId,
    pub insurer: Insurer,
    pub effective_date: NaiveDate,
    pub net_premium: Decimal,
    pub commission_percentage: u32,
}

impl Policy {
    /// Builds a policy from a validated draft and the records it references
    pub fn from_draft(draft: PolicyDraft, insured_id: InsuredId, vehicle_id: VehicleId) -> Self {
        Self {
            code: PolicyCode::new(draft.code),
            insured_id,
            vehicle_id,
            insurer: draft.insurer,
            effective_date: draft.effective_date,
            net_premium: draft.net_premium,
            commission_percentage: draft.commission_percentage,
        }
    }

    /// Replaces the editable fields, keeping the code and both references
    pub fn apply(&mut self, draft: PolicyDraft) {
        self.insurer = draft.insurer;
        self.effective_date = draft.effective_date;
        self.net_premium = draft.net_premium;
        self.commission_percentage = draft.commission_percentage;
    }

    /// The broker's commission on this policy, exact to the last digit
    pub fn total_commission(&self) -> Decimal {
        commission_on(self.net_premium, self.commission_percentage)
    }

    /// Canonical path of this record
    pub fn resource_path(&self) -> String {
        format!("/apolice/{}", self.code)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// The validated policy half of a policy form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PolicyDraft {
    #[validate(length(max = 25))]
    pub code: String,
    pub insurer: Insurer,
    pub effective_date: NaiveDate,
    pub net_premium: Decimal,
    #[validate(range(max = 50))]
    pub commission_percentage: u32,
}

const FORM_NAMES: &[(&str, &str)] = &[
    ("code", field::CODE),
    ("commission_percentage", field::COMMISSION_PERCENTAGE),
];

impl PolicyDraft {
    /// Parses and validates the policy fields of a submitted form
    pub fn from_fields(fields: &FieldMap) -> Result<Self, FieldErrors> {
        let mut reader = FieldReader::new(fields);
        let code = reader.required_text(field::CODE);
        let insurer = reader.required_choice(field::INSURER);
        let effective_date = reader.required_date(field::EFFECTIVE_DATE);
        let net_premium = reader.required_premium(field::NET_PREMIUM);
        let commission_percentage = reader.required_unsigned(field::COMMISSION_PERCENTAGE);
        let mut errors = reader.finish();

        let draft = PolicyDraft {
            code: code.unwrap_or_default(),
            insurer: insurer.unwrap_or(Insurer::Bradesco),
            effective_date: effective_date.unwrap_or(NaiveDate::MIN),
            net_premium: net_premium.unwrap_or_default(),
            commission_percentage: commission_percentage.unwrap_or_default(),
        };
        if let Err(invalid) = draft.validate() {
            errors.merge(FieldErrors::from_validation(invalid, FORM_NAMES));
        }
        errors.into_result(draft)
    }

    pub fn policy_code(&self) -> PolicyCode {
        PolicyCode::new(self.code.clone())
    }
}

/// A full policy form: the policy fields and the vehicle they cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySubmission {
    pub policy: PolicyDraft,
    pub vehicle: VehicleDraft,
}

impl PolicySubmission {
    /// Validates both halves, reporting the union of their errors
    pub fn from_fields(fields: &FieldMap) -> Result<Self, FieldErrors> {
        match (PolicyDraft::from_fields(fields), VehicleDraft::from_fields(fields)) {
            (Ok(policy), Ok(vehicle)) => Ok(Self { policy, vehicle }),
            (policy, vehicle) => {
                let mut errors = FieldErrors::new();
                if let Err(e) = policy {
                    errors.merge(e);
                }
                if let Err(e) = vehicle {
                    errors.merge(e);
                }
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn policy() -> Policy {
        Policy {
            code: PolicyCode::from("TesteCodigo"),
            insured_id: InsuredId::new(1),
            vehicle_id: VehicleId::new(1),
            insurer: Insurer::Bradesco,
            effective_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            net_premium: dec!(2000.00),
            commission_percentage: 10,
        }
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(policy().to_string(), "TesteCodigo");
    }

    #[test]
    fn test_resource_path() {
        assert_eq!(policy().resource_path(), "/apolice/TesteCodigo");
    }

    #[test]
    fn test_total_commission() {
        assert_eq!(policy().total_commission(), dec!(200.00));
    }

    #[test]
    fn test_insurer_lookup() {
        assert_eq!(Insurer::from_code("TM"), Some(Insurer::TokioMarine));
        assert_eq!(Insurer::TokioMarine.name(), "Tokio Marine");
        assert_eq!(Insurer::from_code("XX"), None);
    }
}
