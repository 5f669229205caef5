//! PostgreSQL Brokerage Adapter
//!
//! Implements the `BrokerageStore` port with the insured and policy
//! repositories.
//!
//! # Transactions
//!
//! Every write that touches more than one table runs in one transaction:
//!
//! - registering a policy inserts its vehicle and then the policy
//! - editing a policy locks the policy row, then updates vehicle and policy
//! - deleting a policy or an insured person also removes the vehicles no
//!   remaining policy references
//!
//! A transaction dropped before `commit` is rolled back, so an error at any
//! step leaves the database untouched.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    ChoiceCode, DomainPort, HealthCheckResult, HealthCheckable, InsuredId, PolicyCode, PortError,
    VehicleId,
};
use domain_insured::{InsuredDraft, InsuredPerson, MaritalStatus};
use domain_policy::ports::INSURED_ENTITY;
use domain_policy::{
    BrokerageStore, Insurer, Policy, PolicyDetails, PolicyDraft, ReportPeriod, SearchTerm, Vehicle,
    VehicleDraft,
};

use crate::error::DatabaseError;
use crate::repositories::{insured as insured_repo, policy as policy_repo};
use crate::repositories::{
    InsuredRepository, InsuredRow, PolicyDetailsRow, PolicyRepository, PolicyRow, VehicleRow,
};

const ADAPTER_ID: &str = "postgres-brokerage-store";

/// PostgreSQL-backed implementation of the BrokerageStore trait
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - a missing row becomes `PortError::NotFound`
/// - a taken policy code becomes `PortError::Conflict`
/// - connection and pool failures become `PortError::Connection`
/// - a stored code no domain type recognises becomes `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresBrokerageStore {
    pool: PgPool,
    insured: InsuredRepository,
    policies: PolicyRepository,
}

impl PostgresBrokerageStore {
    /// Creates a new adapter over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            insured: InsuredRepository::new(pool.clone()),
            policies: PolicyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl DomainPort for PostgresBrokerageStore {}

#[async_trait]
impl HealthCheckable for PostgresBrokerageStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => {
                HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e))
            }
        }
    }
}

#[async_trait]
impl BrokerageStore for PostgresBrokerageStore {
    #[instrument(skip(self, draft))]
    async fn insert_insured(&self, draft: InsuredDraft) -> Result<InsuredPerson, PortError> {
        debug!("Inserting insured person");
        let row = self.insured.insert(&draft).await?;
        Ok(insured_from_row(row)?)
    }

    #[instrument(skip(self, draft), fields(insured_id = %id))]
    async fn update_insured(
        &self,
        id: InsuredId,
        draft: InsuredDraft,
    ) -> Result<InsuredPerson, PortError> {
        debug!("Updating insured person");
        let row = self.insured.update(id.value(), &draft).await?;
        Ok(insured_from_row(row)?)
    }

    #[instrument(skip(self), fields(insured_id = %id))]
    async fn delete_insured(&self, id: InsuredId) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let vehicles = policy_repo::delete_for_insured(&mut tx, id.value()).await?;
        insured_repo::delete(&mut tx, id.value()).await?;
        let removed = policy_repo::delete_orphaned_vehicles(&mut tx, &vehicles).await?;

        tx.commit().await.map_err(DatabaseError::from)?;
        debug!(policies = vehicles.len(), vehicles = removed, "Deleted insured person");
        Ok(())
    }

    #[instrument(skip(self), fields(insured_id = %id))]
    async fn get_insured(&self, id: InsuredId) -> Result<InsuredPerson, PortError> {
        let row = self.insured.get(id.value()).await?;
        Ok(insured_from_row(row)?)
    }

    #[instrument(skip(self))]
    async fn list_insured(
        &self,
        search: Option<&SearchTerm>,
    ) -> Result<Vec<InsuredPerson>, PortError> {
        let pattern = search.map(SearchTerm::like_pattern);
        let rows = self.insured.list(pattern.as_deref()).await?;
        debug!(count = rows.len(), "Listed insured persons");
        Ok(rows
            .into_iter()
            .map(insured_from_row)
            .collect::<Result<Vec<_>, DatabaseError>>()?)
    }

    #[instrument(skip(self, policy, vehicle), fields(insured_id = %insured_id, code = %policy.code))]
    async fn insert_policy(
        &self,
        insured_id: InsuredId,
        policy: PolicyDraft,
        vehicle: VehicleDraft,
    ) -> Result<PolicyDetails, PortError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        if !insured_repo::lock(&mut tx, insured_id.value()).await? {
            return Err(PortError::not_found(INSURED_ENTITY, insured_id));
        }
        let vehicle_id = policy_repo::insert_vehicle(&mut tx, &vehicle).await?;
        policy_repo::insert_policy(&mut tx, insured_id.value(), vehicle_id, &policy).await?;
        let row = policy_repo::details(&mut tx, &policy.code).await?;

        tx.commit().await.map_err(DatabaseError::from)?;
        debug!(vehicle_id, "Inserted policy and vehicle");
        Ok(details_from_row(row)?)
    }

    #[instrument(skip(self, policy, vehicle), fields(code = %code))]
    async fn update_policy(
        &self,
        code: &PolicyCode,
        policy: PolicyDraft,
        vehicle: VehicleDraft,
    ) -> Result<PolicyDetails, PortError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let vehicle_id = policy_repo::lock_policy(&mut tx, code.as_str()).await?;
        policy_repo::update_vehicle(&mut tx, vehicle_id, &vehicle).await?;
        policy_repo::update_policy(&mut tx, code.as_str(), &policy).await?;
        let row = policy_repo::details(&mut tx, code.as_str()).await?;

        tx.commit().await.map_err(DatabaseError::from)?;
        debug!("Updated policy and vehicle");
        Ok(details_from_row(row)?)
    }

    #[instrument(skip(self), fields(code = %code))]
    async fn delete_policy(&self, code: &PolicyCode) -> Result<(), PortError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let vehicle_id = policy_repo::delete_policy(&mut tx, code.as_str()).await?;
        let removed = policy_repo::delete_orphaned_vehicles(&mut tx, &[vehicle_id]).await?;

        tx.commit().await.map_err(DatabaseError::from)?;
        debug!(vehicle_id, vehicles = removed, "Deleted policy");
        Ok(())
    }

    #[instrument(skip(self), fields(code = %code))]
    async fn get_policy(&self, code: &PolicyCode) -> Result<PolicyDetails, PortError> {
        let row = self.policies.get_details(code.as_str()).await?;
        Ok(details_from_row(row)?)
    }

    #[instrument(skip(self))]
    async fn list_policies(&self, search: Option<&SearchTerm>) -> Result<Vec<Policy>, PortError> {
        let pattern = search.map(SearchTerm::like_pattern);
        let rows = self.policies.list(pattern.as_deref()).await?;
        debug!(count = rows.len(), "Listed policies");
        Ok(policies_from_rows(rows)?)
    }

    #[instrument(skip(self), fields(insured_id = %id))]
    async fn policies_for_insured(&self, id: InsuredId) -> Result<Vec<Policy>, PortError> {
        let rows = self.policies.for_insured(id.value()).await?;
        Ok(policies_from_rows(rows)?)
    }

    #[instrument(skip(self), fields(year = period.year, month = period.month))]
    async fn policies_in_period(&self, period: ReportPeriod) -> Result<Vec<Policy>, PortError> {
        let Some((start, end)) = period.date_range() else {
            debug!("Period is not a calendar month, nothing to report");
            return Ok(Vec::new());
        };
        let rows = self.policies.in_range(start, end).await?;
        debug!(count = rows.len(), "Listed policies in period");
        Ok(policies_from_rows(rows)?)
    }
}

// ============================================================================
// Row conversion
// ============================================================================

fn corrupt(column: &str, value: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::CorruptRow(format!("unexpected {} value '{}'", column, value))
}

fn insured_from_row(row: InsuredRow) -> Result<InsuredPerson, DatabaseError> {
    let marital_status = MaritalStatus::from_code(&row.marital_status)
        .ok_or_else(|| corrupt("marital_status", &row.marital_status))?;

    Ok(InsuredPerson {
        id: InsuredId::new(row.id),
        name: row.name,
        birth_date: row.birth_date,
        phone: row.phone,
        email: row.email,
        cpf: row.cpf,
        address: row.address,
        marital_status,
    })
}

fn vehicle_from_row(row: VehicleRow) -> Result<Vehicle, DatabaseError> {
    let model_year = u32::try_from(row.model_year).map_err(|_| corrupt("model_year", row.model_year))?;

    Ok(Vehicle {
        id: VehicleId::new(row.id),
        model: row.model,
        plate: row.plate,
        chassis: row.chassis,
        model_year,
        lien: row.lien,
    })
}

fn policy_from_row(row: PolicyRow) -> Result<Policy, DatabaseError> {
    let insurer = Insurer::from_code(&row.insurer).ok_or_else(|| corrupt("insurer", &row.insurer))?;
    let commission_percentage = u32::try_from(row.commission_percentage)
        .map_err(|_| corrupt("commission_percentage", row.commission_percentage))?;

    Ok(Policy {
        code: PolicyCode::new(row.code),
        insured_id: InsuredId::new(row.insured_id),
        vehicle_id: VehicleId::new(row.vehicle_id),
        insurer,
        effective_date: row.effective_date,
        net_premium: row.net_premium,
        commission_percentage,
    })
}

fn policies_from_rows(rows: Vec<PolicyRow>) -> Result<Vec<Policy>, DatabaseError> {
    rows.into_iter().map(policy_from_row).collect()
}

fn details_from_row(row: PolicyDetailsRow) -> Result<PolicyDetails, DatabaseError> {
    Ok(PolicyDetails {
        policy: policy_from_row(row.policy)?,
        vehicle: vehicle_from_row(row.vehicle)?,
        insured: insured_from_row(row.insured)?,
    })
}
