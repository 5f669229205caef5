//! Brokerage Store Port
//!
//! The `BrokerageStore` trait is everything the brokerage needs from
//! persistent storage. Two adapters implement it:
//!
//! - **PostgreSQL Adapter**: `infra_db::PostgresBrokerageStore`
//! - **Mock Adapter**: the in-memory [`mock::MockBrokerageStore`], for tests
//!
//! Every write that touches more than one record (a policy and its vehicle,
//! an insured person and its policies) is atomic: either all of it is stored
//! or none of it is.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_policy::{BrokerageService, BrokerageStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn BrokerageStore> = Arc::new(PostgresBrokerageStore::new(pool));
//! let service = BrokerageService::new(store);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, HealthCheckable, InsuredId, PolicyCode, PortError};
use domain_insured::{InsuredDraft, InsuredPerson};

use crate::commission::ReportPeriod;
use crate::policy::{Policy, PolicyDraft};
use crate::search::SearchTerm;
use crate::vehicle::{Vehicle, VehicleDraft};

/// Entity name used in NotFound errors for insured persons
pub const INSURED_ENTITY: &str = "InsuredPerson";

/// Entity name used in NotFound errors for policies
pub const POLICY_ENTITY: &str = "Policy";

/// A policy together with the records it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDetails {
    pub policy: Policy,
    pub vehicle: Vehicle,
    pub insured: InsuredPerson,
}

/// An insured person together with their policies, ordered by code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuredDetails {
    pub insured: InsuredPerson,
    pub policies: Vec<Policy>,
}

/// Port for brokerage persistence
#[async_trait]
pub trait BrokerageStore: DomainPort + HealthCheckable {
    // ========================================================================
    // Insured persons
    // ========================================================================

    /// Stores a new insured person and assigns its id
    async fn insert_insured(&self, draft: InsuredDraft) -> Result<InsuredPerson, PortError>;

    /// Replaces every field of an insured person except its id
    ///
    /// Returns `PortError::NotFound` if the id does not exist.
    async fn update_insured(
        &self,
        id: InsuredId,
        draft: InsuredDraft,
    ) -> Result<InsuredPerson, PortError>;

    /// Deletes an insured person, every policy referencing it, and the
    /// vehicles of those policies that no remaining policy references
    async fn delete_insured(&self, id: InsuredId) -> Result<(), PortError>;

    /// Retrieves an insured person by id
    async fn get_insured(&self, id: InsuredId) -> Result<InsuredPerson, PortError>;

    /// Lists insured persons ordered by name (ties by id), optionally
    /// filtered by a case-insensitive substring of the name
    async fn list_insured(
        &self,
        search: Option<&SearchTerm>,
    ) -> Result<Vec<InsuredPerson>, PortError>;

    // ========================================================================
    // Policies
    // ========================================================================

    /// Creates the vehicle and then the policy referencing it
    ///
    /// # Errors
    ///
    /// - `PortError::NotFound` if the insured person does not exist
    /// - `PortError::Conflict` if the policy code is already taken
    async fn insert_policy(
        &self,
        insured_id: InsuredId,
        policy: PolicyDraft,
        vehicle: VehicleDraft,
    ) -> Result<PolicyDetails, PortError>;

    /// Replaces a policy's editable fields and its vehicle's fields
    ///
    /// The code and both references are kept; `policy.code` is ignored.
    async fn update_policy(
        &self,
        code: &PolicyCode,
        policy: PolicyDraft,
        vehicle: VehicleDraft,
    ) -> Result<PolicyDetails, PortError>;

    /// Deletes a policy and its vehicle, unless another policy still
    /// references that vehicle
    async fn delete_policy(&self, code: &PolicyCode) -> Result<(), PortError>;

    /// Retrieves a policy with its vehicle and insured person
    async fn get_policy(&self, code: &PolicyCode) -> Result<PolicyDetails, PortError>;

    /// Lists policies ordered by code, optionally filtered to those whose
    /// code or insured person's name contains the term
    async fn list_policies(&self, search: Option<&SearchTerm>) -> Result<Vec<Policy>, PortError>;

    /// Lists the policies of one insured person, ordered by code
    async fn policies_for_insured(&self, id: InsuredId) -> Result<Vec<Policy>, PortError>;

    /// Lists the policies whose effective date falls in the period
    async fn policies_in_period(&self, period: ReportPeriod) -> Result<Vec<Policy>, PortError>;
}

/// Mock adapter for testing
///
/// Stores everything in memory behind a single lock, so each operation sees
/// and leaves a consistent snapshot of all three tables.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{HealthCheckResult, VehicleId};

    #[derive(Debug, Default)]
    struct Tables {
        insured: BTreeMap<InsuredId, InsuredPerson>,
        vehicles: BTreeMap<VehicleId, Vehicle>,
        policies: BTreeMap<PolicyCode, Policy>,
        last_insured_id: i64,
        last_vehicle_id: i64,
    }

    impl Tables {
        fn details(&self, policy: &Policy) -> Result<PolicyDetails, PortError> {
            let vehicle = self
                .vehicles
                .get(&policy.vehicle_id)
                .cloned()
                .ok_or_else(|| PortError::internal(format!("vehicle {} missing", policy.vehicle_id)))?;
            let insured = self
                .insured
                .get(&policy.insured_id)
                .cloned()
                .ok_or_else(|| PortError::internal(format!("insured {} missing", policy.insured_id)))?;
            Ok(PolicyDetails {
                policy: policy.clone(),
                vehicle,
                insured,
            })
        }

        /// Removes the given vehicles unless a stored policy still references them
        fn drop_orphaned_vehicles(&mut self, candidates: BTreeSet<VehicleId>) {
            let referenced: BTreeSet<VehicleId> =
                self.policies.values().map(|p| p.vehicle_id).collect();
            for id in candidates.difference(&referenced) {
                self.vehicles.remove(id);
            }
        }
    }

    /// In-memory mock implementation of BrokerageStore
    #[derive(Debug, Default, Clone)]
    pub struct MockBrokerageStore {
        tables: Arc<RwLock<Tables>>,
        unavailable: Arc<AtomicBool>,
    }

    impl MockBrokerageStore {
        /// Creates a new empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every following call fail with a connection error, as if
        /// the backing database had gone away
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Number of stored vehicles
        pub async fn vehicle_count(&self) -> usize {
            self.tables.read().await.vehicles.len()
        }

        /// Number of stored policies
        pub async fn policy_count(&self) -> usize {
            self.tables.read().await.policies.len()
        }

        /// Stores an extra policy for an existing vehicle
        ///
        /// The registration flow always creates a fresh vehicle; this lets
        /// tests build the shared-vehicle layouts the schema also allows.
        pub async fn attach_policy(
            &self,
            insured_id: InsuredId,
            vehicle_id: VehicleId,
            draft: PolicyDraft,
        ) -> Result<Policy, PortError> {
            self.ensure_available()?;
            let mut tables = self.tables.write().await;
            if !tables.insured.contains_key(&insured_id) {
                return Err(PortError::not_found(INSURED_ENTITY, insured_id));
            }
            if !tables.vehicles.contains_key(&vehicle_id) {
                return Err(PortError::not_found("Vehicle", vehicle_id));
            }
            let code = draft.policy_code();
            if tables.policies.contains_key(&code) {
                return Err(PortError::conflict(format!("policy code {} already exists", code)));
            }
            let policy = Policy::from_draft(draft, insured_id, vehicle_id);
            tables.policies.insert(code, policy.clone());
            Ok(policy)
        }

        fn ensure_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(PortError::connection("mock store unavailable"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockBrokerageStore {}

    #[async_trait]
    impl HealthCheckable for MockBrokerageStore {
        async fn health_check(&self) -> HealthCheckResult {
            match self.ensure_available() {
                Ok(()) => HealthCheckResult::healthy("mock-brokerage-store", 0),
                Err(e) => HealthCheckResult::unhealthy("mock-brokerage-store", 0, e.to_string()),
            }
        }
    }

    #[async_trait]
    impl BrokerageStore for MockBrokerageStore {
        async fn insert_insured(&self, draft: InsuredDraft) -> Result<InsuredPerson, PortError> {
            self.ensure_available()?;
            let mut tables = self.tables.write().await;
            tables.last_insured_id += 1;
            let id = InsuredId::new(tables.last_insured_id);
            let insured = InsuredPerson::from_draft(id, draft);
            tables.insured.insert(id, insured.clone());
            Ok(insured)
        }

        async fn update_insured(
            &self,
            id: InsuredId,
            draft: InsuredDraft,
        ) -> Result<InsuredPerson, PortError> {
            self.ensure_available()?;
            let mut tables = self.tables.write().await;
            let insured = tables
                .insured
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found(INSURED_ENTITY, id))?;
            insured.apply(draft);
            Ok(insured.clone())
        }

        async fn delete_insured(&self, id: InsuredId) -> Result<(), PortError> {
            self.ensure_available()?;
            let mut tables = self.tables.write().await;
            if tables.insured.remove(&id).is_none() {
                return Err(PortError::not_found(INSURED_ENTITY, id));
            }
            let mut vehicles = BTreeSet::new();
            tables.policies.retain(|_, policy| {
                if policy.insured_id == id {
                    vehicles.insert(policy.vehicle_id);
                    false
                } else {
                    true
                }
            });
            tables.drop_orphaned_vehicles(vehicles);
            Ok(())
        }

        async fn get_insured(&self, id: InsuredId) -> Result<InsuredPerson, PortError> {
            self.ensure_available()?;
            self.tables
                .read()
                .await
                .insured
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found(INSURED_ENTITY, id))
        }

        async fn list_insured(
            &self,
            search: Option<&SearchTerm>,
        ) -> Result<Vec<InsuredPerson>, PortError> {
            self.ensure_available()?;
            let tables = self.tables.read().await;
            let mut results: Vec<InsuredPerson> = tables
                .insured
                .values()
                .filter(|i| search.map_or(true, |term| term.matches(&i.name)))
                .cloned()
                .collect();
            results.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            Ok(results)
        }

        async fn insert_policy(
            &self,
            insured_id: InsuredId,
            policy: PolicyDraft,
            vehicle: VehicleDraft,
        ) -> Result<PolicyDetails, PortError> {
            self.ensure_available()?;
            let mut tables = self.tables.write().await;
            if !tables.insured.contains_key(&insured_id) {
                return Err(PortError::not_found(INSURED_ENTITY, insured_id));
            }
            let code = policy.policy_code();
            if tables.policies.contains_key(&code) {
                return Err(PortError::conflict(format!("policy code {} already exists", code)));
            }

            tables.last_vehicle_id += 1;
            let vehicle_id = VehicleId::new(tables.last_vehicle_id);
            tables
                .vehicles
                .insert(vehicle_id, Vehicle::from_draft(vehicle_id, vehicle));
            let policy = Policy::from_draft(policy, insured_id, vehicle_id);
            tables.policies.insert(code, policy.clone());
            tables.details(&policy)
        }

        async fn update_policy(
            &self,
            code: &PolicyCode,
            policy: PolicyDraft,
            vehicle: VehicleDraft,
        ) -> Result<PolicyDetails, PortError> {
            self.ensure_available()?;
            let mut tables = self.tables.write().await;
            let mut updated = tables
                .policies
                .get(code)
                .cloned()
                .ok_or_else(|| PortError::not_found(POLICY_ENTITY, code))?;
            let vehicle_id = updated.vehicle_id;
            tables
                .vehicles
                .get_mut(&vehicle_id)
                .ok_or_else(|| PortError::internal(format!("vehicle {} missing", vehicle_id)))?
                .apply(vehicle);

            updated.apply(policy);
            tables.policies.insert(code.clone(), updated.clone());
            tables.details(&updated)
        }

        async fn delete_policy(&self, code: &PolicyCode) -> Result<(), PortError> {
            self.ensure_available()?;
            let mut tables = self.tables.write().await;
            let removed = tables
                .policies
                .remove(code)
                .ok_or_else(|| PortError::not_found(POLICY_ENTITY, code))?;
            tables.drop_orphaned_vehicles(BTreeSet::from([removed.vehicle_id]));
            Ok(())
        }

        async fn get_policy(&self, code: &PolicyCode) -> Result<PolicyDetails, PortError> {
            self.ensure_available()?;
            let tables = self.tables.read().await;
            let policy = tables
                .policies
                .get(code)
                .ok_or_else(|| PortError::not_found(POLICY_ENTITY, code))?;
            tables.details(policy)
        }

        async fn list_policies(&self, search: Option<&SearchTerm>) -> Result<Vec<Policy>, PortError> {
            self.ensure_available()?;
            let tables = self.tables.read().await;
            // BTreeMap iteration already yields policies ordered by code
            Ok(tables
                .policies
                .values()
                .filter(|p| match search {
                    None => true,
                    Some(term) => {
                        term.matches(p.code.as_str())
                            || tables
                                .insured
                                .get(&p.insured_id)
                                .is_some_and(|i| term.matches(&i.name))
                    }
                })
                .cloned()
                .collect())
        }

        async fn policies_for_insured(&self, id: InsuredId) -> Result<Vec<Policy>, PortError> {
            self.ensure_available()?;
            let tables = self.tables.read().await;
            Ok(tables
                .policies
                .values()
                .filter(|p| p.insured_id == id)
                .cloned()
                .collect())
        }

        async fn policies_in_period(&self, period: ReportPeriod) -> Result<Vec<Policy>, PortError> {
            self.ensure_available()?;
            let tables = self.tables.read().await;
            let mut results: Vec<Policy> = tables
                .policies
                .values()
                .filter(|p| period.contains(p.effective_date))
                .cloned()
                .collect();
            results.sort_by(|a, b| {
                a.effective_date
                    .cmp(&b.effective_date)
                    .then_with(|| a.code.cmp(&b.code))
            });
            Ok(results)
        }
    }
}
