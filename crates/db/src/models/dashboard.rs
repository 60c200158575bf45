//! Dashboard summary models.

use serde::Serialize;
use sqlx::FromRow;

use crate::models::fabric::FabricListItem;

/// Number of cutting orders in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Landing-page totals plus the latest shipments.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub client_count: i64,
    pub active_fabric_count: i64,
    pub order_count: i64,
    pub orders_by_status: Vec<StatusCount>,
    pub recent_shipments: Vec<FabricListItem>,
}
