//! Client entity model and DTOs.

use progettare_core::client::{normalize_optional, validate_client};
use progettare_core::error::CoreError;
use progettare_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A client row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or overwriting a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClientInput {
    /// Input carrying only a name, as created inline from the fabric form.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Validate and trim the input; blank optional fields become `None`.
    pub fn normalized(&self) -> Result<Self, CoreError> {
        validate_client(&self.name, self.email.as_deref())?;
        Ok(Self {
            name: self.name.trim().to_string(),
            email: normalize_optional(self.email.as_deref()),
            phone: normalize_optional(self.phone.as_deref()),
            address: normalize_optional(self.address.as_deref()),
            notes: normalize_optional(self.notes.as_deref()),
        })
    }
}
