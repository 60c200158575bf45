//! Repository for the `cutting_order_lines` table.

use progettare_core::cutting_order::LineDraft;
use progettare_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::cutting_order::{CuttingOrderLine, OrderLineDetail, UpdateOrderLine};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, order_id, fabric_id, meters, remarks, created_at, updated_at";

/// Provides CRUD operations for the fabric lines of a cutting order.
pub struct OrderLineRepo;

impl OrderLineRepo {
    /// Add a line to an order. A fabric already in the order violates
    /// `uq_cutting_order_lines_order_fabric`.
    pub async fn create(
        pool: &PgPool,
        order_id: DbId,
        line: &LineDraft,
    ) -> Result<CuttingOrderLine, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let row = Self::create_inner(&mut tx, order_id, line).await?;
        tx.commit().await?;
        Ok(row)
    }

    pub(crate) async fn create_inner(
        tx: &mut Transaction<'_, Postgres>,
        order_id: DbId,
        line: &LineDraft,
    ) -> Result<CuttingOrderLine, sqlx::Error> {
        let query = format!(
            "INSERT INTO cutting_order_lines (order_id, fabric_id, meters, remarks)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CuttingOrderLine>(&query)
            .bind(order_id)
            .bind(line.fabric_id)
            .bind(line.meters)
            .bind(&line.remarks)
            .fetch_one(&mut **tx)
            .await
    }

    /// Lines of an order joined with their fabric, in insertion order.
    pub async fn list_for_order(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderLineDetail>, sqlx::Error> {
        sqlx::query_as::<_, OrderLineDetail>(
            "SELECT l.id, l.order_id, l.fabric_id, l.meters, l.remarks, \
                    f.article, f.color, f.category, f.description \
             FROM cutting_order_lines l \
             JOIN fabrics f ON f.id = l.fabric_id \
             WHERE l.order_id = $1 \
             ORDER BY l.id",
        )
        .bind(order_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrite a line's meters and remarks.
    ///
    /// Returns `None` if the line does not belong to the order.
    pub async fn update(
        pool: &PgPool,
        order_id: DbId,
        line_id: DbId,
        input: &UpdateOrderLine,
    ) -> Result<Option<CuttingOrderLine>, sqlx::Error> {
        let query = format!(
            "UPDATE cutting_order_lines SET meters = $3, remarks = $4
             WHERE id = $2 AND order_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CuttingOrderLine>(&query)
            .bind(order_id)
            .bind(line_id)
            .bind(input.meters)
            .bind(&input.remarks)
            .fetch_optional(pool)
            .await
    }

    /// Remove a line from its order. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, order_id: DbId, line_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cutting_order_lines WHERE id = $2 AND order_id = $1")
            .bind(order_id)
            .bind(line_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
