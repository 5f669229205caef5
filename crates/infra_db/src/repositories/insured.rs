//! Insured person repository

use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection, PgPool};

use core_kernel::ChoiceCode;
use domain_insured::InsuredDraft;

use crate::error::DatabaseError;

/// A row of `insured_persons`
///
/// The key is read as `insured_id` so the row can be flattened into joined
/// policy queries alongside `policies.insured_id`.
#[derive(Debug, Clone, FromRow)]
pub struct InsuredRow {
    #[sqlx(rename = "insured_id")]
    pub id: i64,
    pub name: String,
    pub birth_date: NaiveDate,
    pub phone: String,
    pub email: Option<String>,
    pub cpf: String,
    pub address: String,
    pub marital_status: String,
}

/// Repository for insured persons
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::InsuredRepository;
///
/// let repo = InsuredRepository::new(pool);
/// let rows = repo.list(Some("%silva%")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InsuredRepository {
    pool: PgPool,
}

impl InsuredRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a new insured person and returns the stored row
    pub async fn insert(&self, draft: &InsuredDraft) -> Result<InsuredRow, DatabaseError> {
        let row = sqlx::query_as::<_, InsuredRow>(
            r#"
            INSERT INTO insured_persons
                (name, birth_date, phone, email, cpf, address, marital_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id AS insured_id, name, birth_date, phone, email, cpf, address, marital_status
            "#,
        )
        .bind(&draft.name)
        .bind(draft.birth_date)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.cpf)
        .bind(&draft.address)
        .bind(draft.marital_status.code())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrites every column except the key
    ///
    /// # Errors
    ///
    /// `DatabaseError::NotFound` if no row has this id
    pub async fn update(&self, id: i64, draft: &InsuredDraft) -> Result<InsuredRow, DatabaseError> {
        sqlx::query_as::<_, InsuredRow>(
            r#"
            UPDATE insured_persons
            SET name = $2, birth_date = $3, phone = $4, email = $5,
                cpf = $6, address = $7, marital_status = $8
            WHERE id = $1
            RETURNING id AS insured_id, name, birth_date, phone, email, cpf, address, marital_status
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(draft.birth_date)
        .bind(&draft.phone)
        .bind(&draft.email)
        .bind(&draft.cpf)
        .bind(&draft.address)
        .bind(draft.marital_status.code())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("InsuredPerson", id))
    }

    /// Retrieves an insured person by id
    pub async fn get(&self, id: i64) -> Result<InsuredRow, DatabaseError> {
        sqlx::query_as::<_, InsuredRow>(
            r#"
            SELECT id AS insured_id, name, birth_date, phone, email, cpf, address, marital_status
            FROM insured_persons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("InsuredPerson", id))
    }

    /// Lists insured persons ordered by name, then id
    ///
    /// `pattern` is an `ILIKE` pattern matched against the name.
    pub async fn list(&self, pattern: Option<&str>) -> Result<Vec<InsuredRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, InsuredRow>(
            r#"
            SELECT id AS insured_id, name, birth_date, phone, email, cpf, address, marital_status
            FROM insured_persons
            WHERE $1::TEXT IS NULL OR name ILIKE $1
            ORDER BY name COLLATE "C", id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Locks an insured row against deletion until the transaction ends
///
/// Returns `false` when the row does not exist. `FOR KEY SHARE` still lets
/// other transactions edit the row but blocks a concurrent `DELETE`.
pub async fn lock(conn: &mut PgConnection, id: i64) -> Result<bool, DatabaseError> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM insured_persons WHERE id = $1 FOR KEY SHARE",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(found.is_some())
}

/// Deletes one insured person row
///
/// Policies must already be gone; see
/// [`policy::delete_for_insured`](super::policy::delete_for_insured).
pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<(), DatabaseError> {
    let result = sqlx::query("DELETE FROM insured_persons WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("InsuredPerson", id));
    }
    Ok(())
}
