//! Repository for the `cutting_orders` table and order composition.

use progettare_core::types::DbId;
use sqlx::PgPool;

use crate::models::cutting_order::{
    CreateCuttingOrder, CuttingOrder, CuttingOrderDetail, CuttingOrderHeader,
    CuttingOrderListItem, UpdateCuttingOrder,
};
use crate::models::dashboard::StatusCount;
use crate::repositories::{GarmentRepo, OrderLineRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, lot_number, client_id, creation_date, status, notes, created_at, updated_at";

/// Header columns joined with the client (`o` = orders, `c` = clients).
const HEADER_COLUMNS: &str = "o.id, o.lot_number, o.client_id, c.name AS client_name, \
                              c.email AS client_email, c.phone AS client_phone, \
                              o.creation_date, o.status, o.notes, o.created_at, o.updated_at";

/// Unique constraint guarding `cutting_orders.lot_number`.
pub const LOT_NUMBER_CONSTRAINT: &str = "uq_cutting_orders_lot_number";

/// Provides CRUD operations for cutting orders.
pub struct CuttingOrderRepo;

impl CuttingOrderRepo {
    /// `true` when `err` is an insert or update losing the race for a lot
    /// number.
    pub fn is_lot_number_conflict(err: &sqlx::Error) -> bool {
        err.as_database_error().is_some_and(|db_err| {
            db_err.is_unique_violation() && db_err.constraint() == Some(LOT_NUMBER_CONSTRAINT)
        })
    }

    /// Insert an order with all its lines, garments and sizes.
    ///
    /// Everything runs in one transaction: a failing child insert leaves no
    /// partial order behind. The order starts as `pending`.
    pub async fn create(
        pool: &PgPool,
        lot_number: &str,
        input: &CreateCuttingOrder,
    ) -> Result<CuttingOrder, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO cutting_orders (lot_number, client_id, creation_date, notes)
             VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, CuttingOrder>(&query)
            .bind(lot_number)
            .bind(input.client_id)
            .bind(input.creation_date)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        for line in &input.lines {
            OrderLineRepo::create_inner(&mut tx, order.id, line).await?;
        }
        for garment in &input.garments {
            GarmentRepo::create_inner(&mut tx, order.id, garment).await?;
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Find an order by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CuttingOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cutting_orders WHERE id = $1");
        sqlx::query_as::<_, CuttingOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an order header with its client's contact fields.
    pub async fn find_header(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CuttingOrderHeader>, sqlx::Error> {
        let query = format!(
            "SELECT {HEADER_COLUMNS}
             FROM cutting_orders o
             JOIN clients c ON c.id = o.client_id
             WHERE o.id = $1"
        );
        sqlx::query_as::<_, CuttingOrderHeader>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the full order: header, lines with fabrics, garments with sizes.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CuttingOrderDetail>, sqlx::Error> {
        let Some(header) = Self::find_header(pool, id).await? else {
            return Ok(None);
        };
        let lines = OrderLineRepo::list_for_order(pool, id).await?;
        let garments = GarmentRepo::list_with_sizes(pool, id).await?;
        Ok(Some(CuttingOrderDetail::new(header, lines, garments)))
    }

    /// List all orders newest first, with client name and line totals.
    pub async fn list(pool: &PgPool) -> Result<Vec<CuttingOrderListItem>, sqlx::Error> {
        sqlx::query_as::<_, CuttingOrderListItem>(
            "SELECT o.id, o.lot_number, o.client_id, c.name AS client_name, \
                    o.creation_date, o.status, o.notes, \
                    COUNT(l.id) AS line_count, \
                    COALESCE(SUM(l.meters), 0)::DOUBLE PRECISION AS total_meters, \
                    o.created_at \
             FROM cutting_orders o \
             JOIN clients c ON c.id = o.client_id \
             LEFT JOIN cutting_order_lines l ON l.order_id = o.id \
             GROUP BY o.id, c.name \
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Overwrite the editable header fields of an order.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCuttingOrder,
    ) -> Result<Option<CuttingOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE cutting_orders SET
                lot_number = $2,
                client_id = $3,
                status = $4,
                notes = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CuttingOrder>(&query)
            .bind(id)
            .bind(&input.lot_number)
            .bind(input.client_id)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Change only the status of an order.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<CuttingOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE cutting_orders SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CuttingOrder>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an order. Lines, garments and sizes go with it by cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cutting_orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a lot number is already taken.
    pub async fn lot_number_exists(pool: &PgPool, lot_number: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM cutting_orders WHERE lot_number = $1)")
                .bind(lot_number)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cutting_orders")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Order counts per status, in lifecycle order.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count \
             FROM cutting_orders \
             GROUP BY status \
             ORDER BY CASE status \
                 WHEN 'pending' THEN 0 \
                 WHEN 'in_process' THEN 1 \
                 ELSE 2 END",
        )
        .fetch_all(pool)
        .await
    }
}
