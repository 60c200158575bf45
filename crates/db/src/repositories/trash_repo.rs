//! Repository for the fabric recycle bin.
//!
//! Lists soft-deleted fabrics and permanently removes them. Fabrics still
//! referenced by a cutting-order line are never purged.

use progettare_core::types::DbId;
use sqlx::PgPool;

use crate::models::fabric::{PurgedFabric, TrashedFabric};

/// Provides recycle-bin operations for fabrics.
pub struct TrashRepo;

impl TrashRepo {
    /// List soft-deleted fabrics with their client, most recently deleted first.
    pub async fn list_trashed(pool: &PgPool) -> Result<Vec<TrashedFabric>, sqlx::Error> {
        sqlx::query_as::<_, TrashedFabric>(
            "SELECT f.id, f.article, f.color, f.description, f.meters, f.shipping_date, \
                    f.category, f.client_id, c.name AS client_name, f.deleted_at \
             FROM fabrics f \
             LEFT JOIN clients c ON c.id = f.client_id \
             WHERE f.deleted_at IS NOT NULL \
             ORDER BY f.deleted_at DESC, f.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Hard-delete a single soft-deleted fabric.
    ///
    /// Returns `None` if no matching soft-deleted row exists. A fabric still
    /// used by an order line fails with a foreign-key violation.
    pub async fn purge_one(pool: &PgPool, id: DbId) -> Result<Option<PurgedFabric>, sqlx::Error> {
        sqlx::query_as::<_, PurgedFabric>(
            "DELETE FROM fabrics WHERE id = $1 AND deleted_at IS NOT NULL \
             RETURNING id, image_url",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Hard-delete every soft-deleted fabric not referenced by an order line.
    pub async fn purge_all(pool: &PgPool) -> Result<Vec<PurgedFabric>, sqlx::Error> {
        sqlx::query_as::<_, PurgedFabric>(
            "DELETE FROM fabrics f \
             WHERE f.deleted_at IS NOT NULL \
               AND NOT EXISTS ( \
                   SELECT 1 FROM cutting_order_lines l WHERE l.fabric_id = f.id \
               ) \
             RETURNING f.id, f.image_url",
        )
        .fetch_all(pool)
        .await
    }

    /// Number of fabrics currently in the bin.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fabrics WHERE deleted_at IS NOT NULL")
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
