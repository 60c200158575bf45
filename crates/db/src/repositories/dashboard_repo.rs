//! Read-only aggregates for the landing dashboard.

use sqlx::PgPool;

use crate::models::dashboard::DashboardSummary;
use crate::repositories::{ClientRepo, CuttingOrderRepo, FabricRepo};

/// Number of shipments listed on the dashboard.
pub const RECENT_SHIPMENTS: i64 = 5;

/// Provides the dashboard summary.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Collect the dashboard totals and the latest shipments.
    pub async fn summary(pool: &PgPool) -> Result<DashboardSummary, sqlx::Error> {
        Ok(DashboardSummary {
            client_count: ClientRepo::count(pool).await?,
            active_fabric_count: FabricRepo::count_active(pool).await?,
            order_count: CuttingOrderRepo::count(pool).await?,
            orders_by_status: CuttingOrderRepo::count_by_status(pool).await?,
            recent_shipments: FabricRepo::recent_shipments(pool, RECENT_SHIPMENTS).await?,
        })
    }
}
