//! Repository for the `clients` table.

use progettare_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::client::{Client, ClientInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, phone, address, notes, created_at, updated_at";

/// Provides CRUD operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a new client, returning the created row.
    pub async fn create(pool: &PgPool, input: &ClientInput) -> Result<Client, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let client = Self::create_inner(&mut tx, input).await?;
        tx.commit().await?;
        Ok(client)
    }

    /// Insert a client inside an existing transaction.
    pub(crate) async fn create_inner(
        tx: &mut Transaction<'_, Postgres>,
        input: &ClientInput,
    ) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (name, email, phone, address, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a client by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = $1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all clients alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY lower(name), id");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }

    /// Overwrite every editable field of a client.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ClientInput,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET
                name = $2,
                email = $3,
                phone = $4,
                address = $5,
                notes = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a client. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while cutting orders still
    /// reference the client. Owned fabrics are unlinked by the schema.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
