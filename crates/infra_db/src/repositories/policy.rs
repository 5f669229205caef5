//! Policy and vehicle repository
//!
//! Vehicles only exist as part of a policy, so both tables are handled here.
//! Vehicle keys are read as `vehicle_id` and insured keys as `insured_id`,
//! which lets a single joined row flatten into all three row types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};

use core_kernel::ChoiceCode;
use domain_policy::{PolicyDraft, VehicleDraft};

use super::insured::InsuredRow;
use crate::error::DatabaseError;

/// A row of `policies`
#[derive(Debug, Clone, FromRow)]
pub struct PolicyRow {
    pub code: String,
    pub insured_id: i64,
    pub vehicle_id: i64,
    pub insurer: String,
    pub effective_date: NaiveDate,
    pub net_premium: Decimal,
    pub commission_percentage: i32,
}

/// A row of `vehicles`
#[derive(Debug, Clone, FromRow)]
pub struct VehicleRow {
    #[sqlx(rename = "vehicle_id")]
    pub id: i64,
    pub model: String,
    pub plate: String,
    pub chassis: String,
    pub model_year: i32,
    pub lien: Option<bool>,
}

/// A policy joined with its vehicle and insured person
#[derive(Debug, Clone, FromRow)]
pub struct PolicyDetailsRow {
    #[sqlx(flatten)]
    pub policy: PolicyRow,
    #[sqlx(flatten)]
    pub vehicle: VehicleRow,
    #[sqlx(flatten)]
    pub insured: InsuredRow,
}

const DETAILS_QUERY: &str = r#"
    SELECT p.code, p.insured_id, p.vehicle_id, p.insurer, p.effective_date,
           p.net_premium, p.commission_percentage,
           v.model, v.plate, v.chassis, v.model_year, v.lien,
           i.name, i.birth_date, i.phone, i.email, i.cpf, i.address, i.marital_status
    FROM policies p
    JOIN vehicles v ON v.id = p.vehicle_id
    JOIN insured_persons i ON i.id = p.insured_id
    WHERE p.code = $1
"#;

/// Read-side repository for policies
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::PolicyRepository;
///
/// let repo = PolicyRepository::new(pool);
/// let rows = repo.in_range(start, end).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a policy with its vehicle and insured person
    pub async fn get_details(&self, code: &str) -> Result<PolicyDetailsRow, DatabaseError> {
        sqlx::query_as::<_, PolicyDetailsRow>(DETAILS_QUERY)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Policy", code))
    }

    /// Lists policies ordered by code
    ///
    /// `pattern` is an `ILIKE` pattern matched against the policy code and
    /// the insured person's name.
    pub async fn list(&self, pattern: Option<&str>) -> Result<Vec<PolicyRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT p.code, p.insured_id, p.vehicle_id, p.insurer, p.effective_date,
                   p.net_premium, p.commission_percentage
            FROM policies p
            JOIN insured_persons i ON i.id = p.insured_id
            WHERE $1::TEXT IS NULL OR p.code ILIKE $1 OR i.name ILIKE $1
            ORDER BY p.code COLLATE "C"
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists the policies of one insured person, ordered by code
    pub async fn for_insured(&self, insured_id: i64) -> Result<Vec<PolicyRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT code, insured_id, vehicle_id, insurer, effective_date,
                   net_premium, commission_percentage
            FROM policies
            WHERE insured_id = $1
            ORDER BY code COLLATE "C"
            "#,
        )
        .bind(insured_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists policies effective in `[start, end)`, ordered by effective date
    /// and then code
    pub async fn in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PolicyRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT code, insured_id, vehicle_id, insurer, effective_date,
                   net_premium, commission_percentage
            FROM policies
            WHERE effective_date >= $1 AND effective_date < $2
            ORDER BY effective_date, code COLLATE "C"
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Retrieves a policy with its vehicle and insured person inside a
/// transaction
pub async fn details(conn: &mut PgConnection, code: &str) -> Result<PolicyDetailsRow, DatabaseError> {
    sqlx::query_as::<_, PolicyDetailsRow>(DETAILS_QUERY)
        .bind(code)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Policy", code))
}

/// Inserts a vehicle and returns its generated id
pub async fn insert_vehicle(
    conn: &mut PgConnection,
    vehicle: &VehicleDraft,
) -> Result<i64, DatabaseError> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO vehicles (model, plate, chassis, model_year, lien)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&vehicle.model)
    .bind(&vehicle.plate)
    .bind(&vehicle.chassis)
    .bind(to_column(vehicle.model_year)?)
    .bind(vehicle.lien)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Inserts a policy row
///
/// A taken code surfaces as `DatabaseError::DuplicateEntry`.
pub async fn insert_policy(
    conn: &mut PgConnection,
    insured_id: i64,
    vehicle_id: i64,
    policy: &PolicyDraft,
) -> Result<(), DatabaseError> {
    sqlx::query(
        r#"
        INSERT INTO policies
            (code, insured_id, vehicle_id, insurer, effective_date, net_premium, commission_percentage)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&policy.code)
    .bind(insured_id)
    .bind(vehicle_id)
    .bind(policy.insurer.code())
    .bind(policy.effective_date)
    .bind(policy.net_premium)
    .bind(to_column(policy.commission_percentage)?)
    .execute(conn)
    .await?;

    Ok(())
}

/// Locks a policy row for the rest of the transaction and returns its
/// vehicle id
pub async fn lock_policy(conn: &mut PgConnection, code: &str) -> Result<i64, DatabaseError> {
    sqlx::query_scalar::<_, i64>("SELECT vehicle_id FROM policies WHERE code = $1 FOR UPDATE")
        .bind(code)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Policy", code))
}

/// Overwrites a vehicle's columns
pub async fn update_vehicle(
    conn: &mut PgConnection,
    vehicle_id: i64,
    vehicle: &VehicleDraft,
) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE vehicles
        SET model = $2, plate = $3, chassis = $4, model_year = $5, lien = $6
        WHERE id = $1
        "#,
    )
    .bind(vehicle_id)
    .bind(&vehicle.model)
    .bind(&vehicle.plate)
    .bind(&vehicle.chassis)
    .bind(to_column(vehicle.model_year)?)
    .bind(vehicle.lien)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Vehicle", vehicle_id));
    }
    Ok(())
}

/// Overwrites a policy's editable columns; the code and both references stay
pub async fn update_policy(
    conn: &mut PgConnection,
    code: &str,
    policy: &PolicyDraft,
) -> Result<(), DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE policies
        SET insurer = $2, effective_date = $3, net_premium = $4, commission_percentage = $5
        WHERE code = $1
        "#,
    )
    .bind(code)
    .bind(policy.insurer.code())
    .bind(policy.effective_date)
    .bind(policy.net_premium)
    .bind(to_column(policy.commission_percentage)?)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Policy", code));
    }
    Ok(())
}

/// Deletes a policy and returns the id of the vehicle it referenced
pub async fn delete_policy(conn: &mut PgConnection, code: &str) -> Result<i64, DatabaseError> {
    sqlx::query_scalar::<_, i64>("DELETE FROM policies WHERE code = $1 RETURNING vehicle_id")
        .bind(code)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Policy", code))
}

/// Deletes every policy of an insured person and returns the vehicle ids
/// they referenced
pub async fn delete_for_insured(
    conn: &mut PgConnection,
    insured_id: i64,
) -> Result<Vec<i64>, DatabaseError> {
    let vehicles = sqlx::query_scalar::<_, i64>(
        "DELETE FROM policies WHERE insured_id = $1 RETURNING vehicle_id",
    )
    .bind(insured_id)
    .fetch_all(conn)
    .await?;

    Ok(vehicles)
}

/// Deletes the given vehicles unless a policy still references them
///
/// Returns the number of vehicles removed.
pub async fn delete_orphaned_vehicles(
    conn: &mut PgConnection,
    candidates: &[i64],
) -> Result<u64, DatabaseError> {
    if candidates.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query(
        r#"
        DELETE FROM vehicles v
        WHERE v.id = ANY($1)
          AND NOT EXISTS (SELECT 1 FROM policies p WHERE p.vehicle_id = v.id)
        "#,
    )
    .bind(candidates)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Converts a validated unsigned value to an `INTEGER` column value
fn to_column(value: u32) -> Result<i32, DatabaseError> {
    i32::try_from(value)
        .map_err(|_| DatabaseError::ConstraintViolation(format!("{} does not fit an INTEGER column", value)))
}
