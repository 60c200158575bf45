//! Query-string parameter types shared by list endpoints.

use progettare_core::fabric::{CategoryFilter, ClientFabricSort, InventorySort};
use serde::Deserialize;

/// `?search=` on lists that only support free-text search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
}

/// Filters of the main inventory list.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryParams {
    pub search: Option<String>,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub sort: InventorySort,
}

/// Filters of a client's fabric list.
#[derive(Debug, Default, Deserialize)]
pub struct ClientFabricParams {
    pub search: Option<String>,
    #[serde(default)]
    pub category: CategoryFilter,
    #[serde(default)]
    pub sort: ClientFabricSort,
}
