//! Brokerage application service
//!
//! `BrokerageService` is the single entry point for every brokerage
//! operation. It validates submitted forms, enforces the rules that span
//! more than one field (the immutable policy code) and hands valid changes
//! to the store.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{FieldMap, HealthCheckResult, InsuredId, PolicyCode};
use domain_insured::{InsuredDraft, InsuredPerson};

use crate::commission::{CommissionReport, ReportPeriod};
use crate::error::BrokerageError;
use crate::policy::{Policy, PolicyDraft, PolicySubmission};
use crate::ports::{BrokerageStore, InsuredDetails, PolicyDetails};
use crate::search::SearchTerm;
use crate::vehicle::VehicleDraft;

/// Service for registering, editing and querying brokerage records
#[derive(Clone)]
pub struct BrokerageService {
    store: Arc<dyn BrokerageStore>,
}

impl BrokerageService {
    /// Creates a service backed by the given store
    pub fn new(store: Arc<dyn BrokerageStore>) -> Self {
        Self { store }
    }

    /// Reports the health of the backing store
    pub async fn health(&self) -> HealthCheckResult {
        self.store.health_check().await
    }

    // ========================================================================
    // Insured persons
    // ========================================================================

    /// Registers a new insured person from a submitted form
    #[instrument(skip(self, fields))]
    pub async fn register_insured(&self, fields: &FieldMap) -> Result<InsuredPerson, BrokerageError> {
        let draft = InsuredDraft::from_fields(fields).map_err(|errors| {
            warn!(%errors, "Rejected insured registration");
            errors
        })?;
        let insured = self.store.insert_insured(draft).await?;
        info!(insured_id = %insured.id, "Registered insured person");
        Ok(insured)
    }

    /// Replaces an insured person's data
    #[instrument(skip(self, fields))]
    pub async fn edit_insured(
        &self,
        id: InsuredId,
        fields: &FieldMap,
    ) -> Result<InsuredPerson, BrokerageError> {
        self.store.get_insured(id).await?;
        let draft = InsuredDraft::from_fields(fields).map_err(|errors| {
            warn!(%errors, "Rejected insured edit");
            errors
        })?;
        let insured = self.store.update_insured(id, draft).await?;
        info!("Updated insured person");
        Ok(insured)
    }

    /// Deletes an insured person and everything that depends on them
    #[instrument(skip(self))]
    pub async fn delete_insured(&self, id: InsuredId) -> Result<(), BrokerageError> {
        self.store.delete_insured(id).await?;
        info!("Deleted insured person and their policies");
        Ok(())
    }

    /// Returns an insured person with their policies
    #[instrument(skip(self))]
    pub async fn get_insured(&self, id: InsuredId) -> Result<InsuredDetails, BrokerageError> {
        let insured = self.store.get_insured(id).await?;
        let policies = self.store.policies_for_insured(id).await?;
        debug!(policies = policies.len(), "Loaded insured person");
        Ok(InsuredDetails { insured, policies })
    }

    /// Lists insured persons, optionally filtered by name
    #[instrument(skip(self))]
    pub async fn list_insured(&self, search: Option<&str>) -> Result<Vec<InsuredPerson>, BrokerageError> {
        let term = SearchTerm::parse(search);
        let insured = self.store.list_insured(term.as_ref()).await?;
        debug!(count = insured.len(), "Listed insured persons");
        Ok(insured)
    }

    // ========================================================================
    // Policies
    // ========================================================================

    /// Registers a policy and its vehicle for an existing insured person
    ///
    /// The policy and vehicle fields are validated together; all messages
    /// from both are reported at once.
    #[instrument(skip(self, fields))]
    pub async fn register_policy(
        &self,
        insured_id: InsuredId,
        fields: &FieldMap,
    ) -> Result<PolicyDetails, BrokerageError> {
        self.store.get_insured(insured_id).await?;
        let submission = PolicySubmission::from_fields(fields).map_err(|errors| {
            warn!(%errors, "Rejected policy registration");
            errors
        })?;

        let code = submission.policy.policy_code();
        let details = self
            .store
            .insert_policy(insured_id, submission.policy, submission.vehicle)
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    warn!(%code, "Policy code already registered");
                    BrokerageError::DuplicateKey(code.clone())
                } else {
                    e.into()
                }
            })?;
        info!(%code, vehicle_id = %details.vehicle.id, "Registered policy");
        Ok(details)
    }

    /// Edits a policy and its vehicle
    ///
    /// The policy fields are validated first. A valid form that carries a
    /// different code is rejected with `CodeImmutable` before the vehicle
    /// fields are looked at, and nothing is written.
    #[instrument(skip(self, fields))]
    pub async fn edit_policy(
        &self,
        code: &PolicyCode,
        fields: &FieldMap,
    ) -> Result<PolicyDetails, BrokerageError> {
        let existing = self.store.get_policy(code).await?;

        let policy = PolicyDraft::from_fields(fields).map_err(|errors| {
            warn!(%errors, "Rejected policy edit");
            errors
        })?;
        if policy.code != existing.policy.code.as_str() {
            warn!(submitted = %policy.code, "Attempt to change policy code");
            return Err(BrokerageError::CodeImmutable {
                stored: existing.policy.code,
                submitted: policy.code,
            });
        }

        let vehicle = VehicleDraft::from_fields(fields).map_err(|errors| {
            warn!(%errors, "Rejected vehicle edit");
            errors
        })?;
        let details = self.store.update_policy(code, policy, vehicle).await?;
        info!("Updated policy");
        Ok(details)
    }

    /// Deletes a policy and its vehicle
    #[instrument(skip(self))]
    pub async fn delete_policy(&self, code: &PolicyCode) -> Result<(), BrokerageError> {
        self.store.delete_policy(code).await?;
        info!("Deleted policy");
        Ok(())
    }

    /// Returns a policy with its vehicle and insured person
    #[instrument(skip(self))]
    pub async fn get_policy(&self, code: &PolicyCode) -> Result<PolicyDetails, BrokerageError> {
        Ok(self.store.get_policy(code).await?)
    }

    /// Lists policies, optionally filtered by code or insured name
    #[instrument(skip(self))]
    pub async fn list_policies(&self, search: Option<&str>) -> Result<Vec<Policy>, BrokerageError> {
        let term = SearchTerm::parse(search);
        let policies = self.store.list_policies(term.as_ref()).await?;
        debug!(count = policies.len(), "Listed policies");
        Ok(policies)
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Builds the commission report for a month
    ///
    /// Without a period the report is empty and has no total.
    #[instrument(skip(self))]
    pub async fn report(&self, period: Option<ReportPeriod>) -> Result<CommissionReport, BrokerageError> {
        let Some(period) = period else {
            return Ok(CommissionReport::empty());
        };
        let policies = self.store.policies_in_period(period).await?;
        let report = CommissionReport::build(period, policies);
        debug!(
            policies = report.len(),
            total = ?report.total_commission,
            "Built commission report"
        );
        Ok(report)
    }
}

