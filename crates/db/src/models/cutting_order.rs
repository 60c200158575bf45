//! Cutting order, line, garment and size models and DTOs.

use progettare_core::client::normalize_optional;
use progettare_core::cutting_order::{
    summarize_order, validate_lot_number, validate_status, GarmentDraft, LineDraft, LineFields,
    OrderSummary, SizeDraft,
};
use progettare_core::error::CoreError;
use progettare_core::export::{GarmentExport, LineExport, OrderExport};
use progettare_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A cutting order row from the `cutting_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CuttingOrder {
    pub id: DbId,
    pub lot_number: String,
    pub client_id: DbId,
    pub creation_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order row for the list view, with its client name and line totals.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CuttingOrderListItem {
    pub id: DbId,
    pub lot_number: String,
    pub client_id: DbId,
    pub client_name: String,
    pub creation_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub line_count: i64,
    pub total_meters: f64,
    pub created_at: Timestamp,
}

/// Order header joined with the client contact fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CuttingOrderHeader {
    pub id: DbId,
    pub lot_number: String,
    pub client_id: DbId,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub creation_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `cutting_order_lines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CuttingOrderLine {
    pub id: DbId,
    pub order_id: DbId,
    pub fabric_id: DbId,
    pub meters: f64,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order line joined with the fabric it cuts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderLineDetail {
    pub id: DbId,
    pub order_id: DbId,
    pub fabric_id: DbId,
    pub meters: f64,
    pub remarks: Option<String>,
    pub article: String,
    pub color: String,
    pub category: String,
    pub description: String,
}

impl LineFields for OrderLineDetail {
    fn meters(&self) -> f64 {
        self.meters
    }
    fn remarks(&self) -> Option<&str> {
        self.remarks.as_deref()
    }
}

/// A row from the `garments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Garment {
    pub id: DbId,
    pub order_id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `garment_sizes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GarmentSize {
    pub id: DbId,
    pub garment_id: DbId,
    pub size: String,
    pub quantity: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A garment together with its size breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct GarmentWithSizes {
    #[serde(flatten)]
    pub garment: Garment,
    pub sizes: Vec<GarmentSize>,
}

/// Full order view: header, lines, garments and totals.
#[derive(Debug, Clone, Serialize)]
pub struct CuttingOrderDetail {
    #[serde(flatten)]
    pub order: CuttingOrderHeader,
    pub lines: Vec<OrderLineDetail>,
    pub garments: Vec<GarmentWithSizes>,
    pub summary: OrderSummary,
}

impl CuttingOrderDetail {
    pub fn new(
        order: CuttingOrderHeader,
        lines: Vec<OrderLineDetail>,
        garments: Vec<GarmentWithSizes>,
    ) -> Self {
        let summary = summarize_order(
            &lines,
            garments.len(),
            garments
                .iter()
                .flat_map(|g| g.sizes.iter().map(|s| s.quantity)),
        );
        Self {
            order,
            lines,
            garments,
            summary,
        }
    }

    /// Flatten the detail into the shape the exporters render.
    pub fn to_export(&self) -> OrderExport {
        OrderExport {
            lot_number: self.order.lot_number.clone(),
            client_name: self.order.client_name.clone(),
            status: self.order.status.clone(),
            creation_date: self.order.creation_date,
            notes: self.order.notes.clone(),
            lines: self
                .lines
                .iter()
                .map(|l| LineExport {
                    article: l.article.clone(),
                    color: l.color.clone(),
                    category: l.category.clone(),
                    description: l.description.clone(),
                    meters: l.meters,
                    remarks: l.remarks.clone(),
                })
                .collect(),
            garments: self
                .garments
                .iter()
                .map(|g| GarmentExport {
                    name: g.garment.name.clone(),
                    sizes: g
                        .sizes
                        .iter()
                        .map(|s| (s.size.clone(), s.quantity))
                        .collect(),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for composing a new order with its lines and garments.
///
/// `lot_number` is generated when omitted; `creation_date` defaults to today.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCuttingOrder {
    pub client_id: DbId,
    #[serde(default)]
    pub lot_number: Option<String>,
    #[serde(default)]
    pub creation_date: Option<Date>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<LineDraft>,
    #[serde(default)]
    pub garments: Vec<GarmentDraft>,
}

impl CreateCuttingOrder {
    /// Trim free text and drop blank remarks. Size labels are trimmed too.
    pub fn normalized(&self) -> Self {
        Self {
            lot_number: normalize_optional(self.lot_number.as_deref()),
            notes: normalize_optional(self.notes.as_deref()),
            lines: self
                .lines
                .iter()
                .map(|l| LineDraft {
                    remarks: normalize_optional(l.remarks.as_deref()),
                    ..l.clone()
                })
                .collect(),
            garments: self
                .garments
                .iter()
                .map(|g| GarmentDraft {
                    name: g.name.trim().to_string(),
                    sizes: trim_sizes(&g.sizes),
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// Trim each size label, keeping the quantities.
pub fn trim_sizes(sizes: &[SizeDraft]) -> Vec<SizeDraft> {
    sizes
        .iter()
        .map(|s| SizeDraft {
            size: s.size.trim().to_string(),
            quantity: s.quantity,
        })
        .collect()
}

/// DTO for overwriting an order header.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCuttingOrder {
    pub lot_number: String,
    pub client_id: DbId,
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateCuttingOrder {
    pub fn normalized(&self) -> Result<Self, CoreError> {
        let lot_number = self.lot_number.trim().to_string();
        validate_lot_number(&lot_number)?;
        validate_status(&self.status)?;
        Ok(Self {
            lot_number,
            client_id: self.client_id,
            status: self.status.clone(),
            notes: normalize_optional(self.notes.as_deref()),
        })
    }
}

/// Body of the status-only update.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// DTO for overwriting a line's meters and remarks.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderLine {
    pub meters: f64,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Body of the size-grid replacement for one garment.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceSizes {
    pub sizes: Vec<SizeDraft>,
}
