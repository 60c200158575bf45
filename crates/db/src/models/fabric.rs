//! Fabric entity model, inventory views and DTOs.

use progettare_core::client::normalize_optional;
use progettare_core::error::CoreError;
use progettare_core::export::InventoryExport;
use progettare_core::fabric::{validate_fabric, FabricFields, CATEGORY_FABRIC, PATTERN_PLAIN};
use progettare_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A fabric row from the `fabrics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Fabric {
    pub id: DbId,
    pub article: String,
    pub color: String,
    pub description: String,
    pub meters: f64,
    pub shipping_date: Date,
    pub category: String,
    pub pattern: String,
    pub client_id: Option<DbId>,
    pub image_url: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Active fabric joined with its owning client, as shown in the inventory.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FabricListItem {
    pub id: DbId,
    pub article: String,
    pub color: String,
    pub description: String,
    pub meters: f64,
    pub shipping_date: Date,
    pub category: String,
    pub pattern: String,
    pub image_url: Option<String>,
    pub client_id: Option<DbId>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub created_at: Timestamp,
}

/// Soft-deleted fabric as listed in the recycle bin.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrashedFabric {
    pub id: DbId,
    pub article: String,
    pub color: String,
    pub description: String,
    pub meters: f64,
    pub shipping_date: Date,
    pub category: String,
    pub client_id: Option<DbId>,
    pub client_name: Option<String>,
    pub deleted_at: Timestamp,
}

/// What is left of a permanently removed fabric: enough to clean up its
/// stored image.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurgedFabric {
    pub id: DbId,
    pub image_url: Option<String>,
}

fn default_category() -> String {
    CATEGORY_FABRIC.to_string()
}

fn default_pattern() -> String {
    PATTERN_PLAIN.to_string()
}

/// DTO for creating or overwriting a fabric.
///
/// When `new_client_name` is non-blank and `client_id` is absent, a client
/// with that name is created alongside the fabric.
#[derive(Debug, Clone, Deserialize)]
pub struct FabricInput {
    pub article: String,
    pub color: String,
    pub description: String,
    pub meters: f64,
    pub shipping_date: Date,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub client_id: Option<DbId>,
    #[serde(default)]
    pub new_client_name: Option<String>,
}

impl FabricInput {
    /// Validate and trim the input.
    pub fn normalized(&self) -> Result<Self, CoreError> {
        validate_fabric(
            &self.article,
            &self.color,
            &self.description,
            self.meters,
            &self.category,
            &self.pattern,
        )?;
        let new_client_name = match self.client_id {
            Some(_) => None,
            None => normalize_optional(self.new_client_name.as_deref()),
        };
        Ok(Self {
            article: self.article.trim().to_string(),
            color: self.color.trim().to_string(),
            description: self.description.trim().to_string(),
            new_client_name,
            ..self.clone()
        })
    }
}

impl FabricFields for Fabric {
    fn article(&self) -> &str {
        &self.article
    }
    fn color(&self) -> &str {
        &self.color
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn meters(&self) -> f64 {
        self.meters
    }
    fn shipping_date(&self) -> Date {
        self.shipping_date
    }
}

impl FabricFields for FabricListItem {
    fn article(&self) -> &str {
        &self.article
    }
    fn color(&self) -> &str {
        &self.color
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn meters(&self) -> f64 {
        self.meters
    }
    fn shipping_date(&self) -> Date {
        self.shipping_date
    }
    fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }
}

impl FabricFields for TrashedFabric {
    fn article(&self) -> &str {
        &self.article
    }
    fn color(&self) -> &str {
        &self.color
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn meters(&self) -> f64 {
        self.meters
    }
    fn shipping_date(&self) -> Date {
        self.shipping_date
    }
    fn client_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }
}

impl From<&FabricListItem> for InventoryExport {
    fn from(f: &FabricListItem) -> Self {
        Self {
            article: f.article.clone(),
            color: f.color.clone(),
            description: f.description.clone(),
            meters: f.meters,
            category: f.category.clone(),
            pattern: f.pattern.clone(),
            shipping_date: f.shipping_date,
            client_name: f.client_name.clone(),
        }
    }
}
