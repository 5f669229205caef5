//! Policy DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::ChoiceCode;
use domain_policy::{Policy, PolicyDetails, Vehicle};

use super::insured::InsuredResponse;

#[derive(Debug, Serialize)]
pub struct PolicySummary {
    pub code: String,
    pub insured_id: i64,
    pub vehicle_id: i64,
    pub insurer: &'static str,
    pub insurer_name: &'static str,
    pub effective_date: NaiveDate,
    pub net_premium: Decimal,
    pub commission_percentage: u32,
    pub total_commission: Decimal,
    pub path: String,
}

impl From<Policy> for PolicySummary {
    fn from(policy: Policy) -> Self {
        Self {
            total_commission: policy.total_commission(),
            path: policy.resource_path(),
            insured_id: policy.insured_id.value(),
            vehicle_id: policy.vehicle_id.value(),
            insurer: policy.insurer.code(),
            insurer_name: policy.insurer.name(),
            effective_date: policy.effective_date,
            net_premium: policy.net_premium,
            commission_percentage: policy.commission_percentage,
            code: policy.code.into_inner(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub model: String,
    pub plate: String,
    pub chassis: String,
    pub model_year: u32,
    pub lien: Option<bool>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id.value(),
            model: vehicle.model,
            plate: vehicle.plate,
            chassis: vehicle.chassis,
            model_year: vehicle.model_year,
            lien: vehicle.lien,
        }
    }
}

/// A policy with its vehicle and insured person
#[derive(Debug, Serialize)]
pub struct PolicyDetailsResponse {
    pub policy: PolicySummary,
    pub vehicle: VehicleResponse,
    pub insured: InsuredResponse,
}

impl From<PolicyDetails> for PolicyDetailsResponse {
    fn from(details: PolicyDetails) -> Self {
        Self {
            policy: details.policy.into(),
            vehicle: details.vehicle.into(),
            insured: details.insured.into(),
        }
    }
}
