//! Repository for the `fabrics` table (active inventory side).
//!
//! Soft-deleted rows are hidden from every query here; the recycle bin lives
//! in [`TrashRepo`](crate::repositories::TrashRepo).

use progettare_core::cutting_order::FabricOwnership;
use progettare_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::client::ClientInput;
use crate::models::fabric::{Fabric, FabricInput, FabricListItem};
use crate::repositories::ClientRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, article, color, description, meters, shipping_date, category, \
                       pattern, client_id, image_url, deleted_at, created_at, updated_at";

/// Columns of the inventory view (`f` = fabrics, `c` = clients).
const LIST_COLUMNS: &str = "f.id, f.article, f.color, f.description, f.meters, \
                            f.shipping_date, f.category, f.pattern, f.image_url, f.client_id, \
                            c.name AS client_name, c.phone AS client_phone, \
                            c.email AS client_email, f.created_at";

/// Provides CRUD and soft-delete operations for fabrics.
pub struct FabricRepo;

impl FabricRepo {
    /// Insert a new fabric, returning the created row.
    ///
    /// When the input names a new client, that client is created first in
    /// the same transaction and the fabric is linked to it.
    pub async fn create(pool: &PgPool, input: &FabricInput) -> Result<Fabric, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let client_id = Self::resolve_client(&mut tx, input).await?;

        let query = format!(
            "INSERT INTO fabrics
                (article, color, description, meters, shipping_date, category, pattern, client_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let fabric = sqlx::query_as::<_, Fabric>(&query)
            .bind(&input.article)
            .bind(&input.color)
            .bind(&input.description)
            .bind(input.meters)
            .bind(input.shipping_date)
            .bind(&input.category)
            .bind(&input.pattern)
            .bind(client_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(fabric)
    }

    /// Find an active fabric by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Fabric>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fabrics WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Fabric>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a fabric by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Fabric>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fabrics WHERE id = $1");
        sqlx::query_as::<_, Fabric>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the active inventory with client details, latest shipments first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<FabricListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM fabrics f
             LEFT JOIN clients c ON c.id = f.client_id
             WHERE f.deleted_at IS NULL
             ORDER BY f.shipping_date DESC, f.id DESC"
        );
        sqlx::query_as::<_, FabricListItem>(&query)
            .fetch_all(pool)
            .await
    }

    /// Latest `limit` active shipments, for the dashboard.
    pub async fn recent_shipments(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<FabricListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM fabrics f
             LEFT JOIN clients c ON c.id = f.client_id
             WHERE f.deleted_at IS NULL
             ORDER BY f.shipping_date DESC, f.id DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, FabricListItem>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List a client's active fabrics, latest shipments first.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
    ) -> Result<Vec<Fabric>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM fabrics
             WHERE client_id = $1 AND deleted_at IS NULL
             ORDER BY shipping_date DESC, id DESC"
        );
        sqlx::query_as::<_, Fabric>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Owners of those `ids` that exist and are not in the recycle bin.
    pub async fn active_ownership(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<FabricOwnership>, sqlx::Error> {
        let rows: Vec<(DbId, Option<DbId>)> = sqlx::query_as(
            "SELECT id, client_id FROM fabrics WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(fabric_id, client_id)| FabricOwnership {
                fabric_id,
                client_id,
            })
            .collect())
    }

    /// Overwrite every editable field of an active fabric. The image is kept.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &FabricInput,
    ) -> Result<Option<Fabric>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let client_id = Self::resolve_client(&mut tx, input).await?;

        let query = format!(
            "UPDATE fabrics SET
                article = $2,
                color = $3,
                description = $4,
                meters = $5,
                shipping_date = $6,
                category = $7,
                pattern = $8,
                client_id = $9
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let fabric = sqlx::query_as::<_, Fabric>(&query)
            .bind(id)
            .bind(&input.article)
            .bind(&input.color)
            .bind(&input.description)
            .bind(input.meters)
            .bind(input.shipping_date)
            .bind(&input.category)
            .bind(&input.pattern)
            .bind(client_id)
            .fetch_optional(&mut *tx)
            .await?;

        match fabric {
            Some(_) => tx.commit().await?,
            // Unknown fabric: discard any client created for it.
            None => tx.rollback().await?,
        }
        Ok(fabric)
    }

    /// Point an active fabric at a newly stored image.
    pub async fn set_image_url(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
    ) -> Result<Option<Fabric>, sqlx::Error> {
        let query = format!(
            "UPDATE fabrics SET image_url = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Fabric>(&query)
            .bind(id)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a fabric by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE fabrics SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted fabric. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE fabrics SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fabrics WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// The client the fabric should be linked to, creating it if the input
    /// names a new one.
    async fn resolve_client(
        tx: &mut Transaction<'_, Postgres>,
        input: &FabricInput,
    ) -> Result<Option<DbId>, sqlx::Error> {
        match (input.client_id, input.new_client_name.as_deref()) {
            (Some(id), _) => Ok(Some(id)),
            (None, Some(name)) => {
                let client = ClientRepo::create_inner(tx, &ClientInput::named(name)).await?;
                tracing::info!(client_id = client.id, "Created client from fabric form");
                Ok(Some(client.id))
            }
            (None, None) => Ok(None),
        }
    }
}
