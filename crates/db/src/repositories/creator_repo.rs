//! Queries for the `creators` table.

use canopy_core::types::DbId;
use sqlx::PgPool;

use crate::models::creator::{CreateCreator, Creator, UpdateCreator};

/// Full column set, shared so every query maps the complete row.
const COLUMNS: &str = "id, name, phone, email, password_hash, bio, is_active, \
                        last_seen_at, created_at, updated_at";

/// Creator queries. Zero-sized; methods borrow the pool.
pub struct CreatorRepo;

impl CreatorRepo {
    /// Insert and return the new row.
    ///
    /// Unique-index violations come back as `sqlx::Error::Database`; the
    /// API layer turns those into conflict responses.
    pub async fn create(pool: &PgPool, input: &CreateCreator) -> Result<Creator, sqlx::Error> {
        let query = format!(
            "INSERT INTO creators (name, phone, email, password_hash, bio)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }

    /// Look up one creator by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Creator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM creators WHERE id = $1");
        sqlx::query_as::<_, Creator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a creator matching either identifier.
    ///
    /// A `None` argument never matches (SQL `= NULL` is not true), so callers
    /// may pass whichever identifier the login request supplied. With both
    /// `None` this always returns `Ok(None)`; the handler rejects that case
    /// before querying.
    pub async fn find_by_phone_or_email(
        pool: &PgPool,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<Creator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM creators WHERE phone = $1 OR email = $2");
        sqlx::query_as::<_, Creator>(&query)
            .bind(phone)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Apply the non-`None` fields of `input` and return the fresh row.
    ///
    /// `COALESCE` keeps the stored value for fields the caller left unset.
    /// An unknown `id` yields `None`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCreator,
    ) -> Result<Option<Creator>, sqlx::Error> {
        let query = format!(
            "UPDATE creators SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creator>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.bio)
            .fetch_optional(pool)
            .await
    }

    /// Stamp the creator's last successful authentication.
    ///
    /// `false` means the id matched no row.
    pub async fn touch_last_seen(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE creators SET last_seen_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear `is_active`, locking the account out of login.
    ///
    /// `false` when the creator was already inactive or does not exist, so
    /// repeated calls are harmless.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE creators SET is_active = false WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
