//! Repository for the `garments` and `garment_sizes` tables.

use std::collections::HashMap;

use progettare_core::cutting_order::{GarmentDraft, SizeDraft};
use progettare_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::cutting_order::{Garment, GarmentSize, GarmentWithSizes};

const COLUMNS: &str = "id, order_id, name, created_at, updated_at";

const SIZE_COLUMNS: &str = "id, garment_id, size, quantity, created_at, updated_at";

/// Provides operations on the garment/size grid of a cutting order.
pub struct GarmentRepo;

impl GarmentRepo {
    /// Add a garment with its sizes to an order.
    pub async fn create(
        pool: &PgPool,
        order_id: DbId,
        garment: &GarmentDraft,
    ) -> Result<GarmentWithSizes, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let created = Self::create_inner(&mut tx, order_id, garment).await?;
        tx.commit().await?;
        Ok(created)
    }

    pub(crate) async fn create_inner(
        tx: &mut Transaction<'_, Postgres>,
        order_id: DbId,
        garment: &GarmentDraft,
    ) -> Result<GarmentWithSizes, sqlx::Error> {
        let query = format!(
            "INSERT INTO garments (order_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Garment>(&query)
            .bind(order_id)
            .bind(&garment.name)
            .fetch_one(&mut **tx)
            .await?;
        let sizes = Self::insert_sizes(tx, row.id, &garment.sizes).await?;
        Ok(GarmentWithSizes { garment: row, sizes })
    }

    /// Find a garment, scoped to its order.
    pub async fn find_by_id(
        pool: &PgPool,
        order_id: DbId,
        garment_id: DbId,
    ) -> Result<Option<Garment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM garments WHERE id = $2 AND order_id = $1");
        sqlx::query_as::<_, Garment>(&query)
            .bind(order_id)
            .bind(garment_id)
            .fetch_optional(pool)
            .await
    }

    /// Garments of an order with their sizes, both in insertion order.
    pub async fn list_with_sizes(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<GarmentWithSizes>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM garments WHERE order_id = $1 ORDER BY id");
        let garments = sqlx::query_as::<_, Garment>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await?;
        if garments.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = garments.iter().map(|g| g.id).collect();
        let query = format!(
            "SELECT {SIZE_COLUMNS} FROM garment_sizes WHERE garment_id = ANY($1) ORDER BY id"
        );
        let sizes = sqlx::query_as::<_, GarmentSize>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_garment: HashMap<DbId, Vec<GarmentSize>> = HashMap::new();
        for size in sizes {
            by_garment.entry(size.garment_id).or_default().push(size);
        }
        Ok(garments
            .into_iter()
            .map(|garment| GarmentWithSizes {
                sizes: by_garment.remove(&garment.id).unwrap_or_default(),
                garment,
            })
            .collect())
    }

    /// Replace the whole size breakdown of a garment.
    pub async fn replace_sizes(
        pool: &PgPool,
        garment_id: DbId,
        sizes: &[SizeDraft],
    ) -> Result<Vec<GarmentSize>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM garment_sizes WHERE garment_id = $1")
            .bind(garment_id)
            .execute(&mut *tx)
            .await?;
        let rows = Self::insert_sizes(&mut tx, garment_id, sizes).await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Delete a garment and its sizes. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        order_id: DbId,
        garment_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM garments WHERE id = $2 AND order_id = $1")
            .bind(order_id)
            .bind(garment_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_sizes(
        tx: &mut Transaction<'_, Postgres>,
        garment_id: DbId,
        sizes: &[SizeDraft],
    ) -> Result<Vec<GarmentSize>, sqlx::Error> {
        let query = format!(
            "INSERT INTO garment_sizes (garment_id, size, quantity)
             VALUES ($1, $2, $3)
             RETURNING {SIZE_COLUMNS}"
        );
        let mut rows = Vec::with_capacity(sizes.len());
        for size in sizes {
            let row = sqlx::query_as::<_, GarmentSize>(&query)
                .bind(garment_id)
                .bind(&size.size)
                .bind(size.quantity)
                .fetch_one(&mut **tx)
                .await?;
            rows.push(row);
        }
        Ok(rows)
    }
}
