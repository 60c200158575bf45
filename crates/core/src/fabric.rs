//! Fabric inventory rules.
//!
//! Category/pattern constants and validation, the listing filters and sort
//! orders used by the inventory and client views, and the per-list summary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::search::{any_field_matches, normalize_term};
use crate::types::Date;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Outer fabric ("tela").
pub const CATEGORY_FABRIC: &str = "fabric";

/// Lining fabric ("forrería").
pub const CATEGORY_LINING: &str = "lining";

/// Solid colour ("lisa").
pub const PATTERN_PLAIN: &str = "plain";

/// Printed or woven pattern ("fantasía").
pub const PATTERN_FANCY: &str = "fancy";

const VALID_CATEGORIES: &[&str] = &[CATEGORY_FABRIC, CATEGORY_LINING];
const VALID_PATTERNS: &[&str] = &[PATTERN_PLAIN, PATTERN_FANCY];

/// Upper bound on a single fabric roll or cut, in meters.
pub const MAX_METERS: f64 = 100_000.0;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid category '{category}'. Must be one of: {VALID_CATEGORIES:?}"
        )))
    }
}

pub fn validate_pattern(pattern: &str) -> Result<(), CoreError> {
    if VALID_PATTERNS.contains(&pattern) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid pattern '{pattern}'. Must be one of: {VALID_PATTERNS:?}"
        )))
    }
}

/// Meters must be a finite, strictly positive number no larger than [`MAX_METERS`].
pub fn validate_meters(meters: f64) -> Result<(), CoreError> {
    if !meters.is_finite() || meters <= 0.0 {
        return Err(CoreError::validation("Meters must be greater than zero"));
    }
    if meters > MAX_METERS {
        return Err(CoreError::Validation(format!(
            "Meters must not exceed {MAX_METERS}"
        )));
    }
    Ok(())
}

/// Validate every editable fabric field at once.
pub fn validate_fabric(
    article: &str,
    color: &str,
    description: &str,
    meters: f64,
    category: &str,
    pattern: &str,
) -> Result<(), CoreError> {
    for (label, value) in [
        ("Article", article),
        ("Color", color),
        ("Description", description),
    ] {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!("{label} is required")));
        }
    }
    validate_meters(meters)?;
    validate_category(category)?;
    validate_pattern(pattern)
}

// ---------------------------------------------------------------------------
// Display labels
// ---------------------------------------------------------------------------

/// Spanish label used in exports and shared messages.
pub fn category_label(category: &str) -> &'static str {
    match category {
        CATEGORY_LINING => "Forrería",
        _ => "Tela",
    }
}

pub fn pattern_label(pattern: &str) -> &'static str {
    match pattern {
        PATTERN_FANCY => "Fantasía",
        _ => "Lisa",
    }
}

// ---------------------------------------------------------------------------
// Listing filters
// ---------------------------------------------------------------------------

/// Read access to the fields the listing filters and sorts look at.
///
/// Implemented by the row types in the db crate so this module stays free of
/// any persistence concern.
pub trait FabricFields {
    fn article(&self) -> &str;
    fn color(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> &str;
    fn meters(&self) -> f64;
    fn shipping_date(&self) -> Date;

    /// Name of the owning client, when the row carries it.
    fn client_name(&self) -> Option<&str> {
        None
    }
}

/// `?category=` filter accepted by fabric listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Fabric,
    Lining,
}

impl CategoryFilter {
    pub fn accepts(self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Fabric => category == CATEGORY_FABRIC,
            CategoryFilter::Lining => category == CATEGORY_LINING,
        }
    }
}

/// Sort order of the main inventory list (by shipping date).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySort {
    #[default]
    Recent,
    Oldest,
}

/// Sort order of the per-client fabric list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientFabricSort {
    #[default]
    DateDesc,
    DateAsc,
    Article,
    /// Largest rolls first.
    Meters,
}

/// Keep the fabrics matching the search term and category filter.
///
/// The term is matched against article, color, description and, when the
/// row carries one, the client name.
pub fn filter_fabrics<T: FabricFields>(
    items: Vec<T>,
    term: Option<&str>,
    category: CategoryFilter,
) -> Vec<T> {
    let term = normalize_term(term);
    items
        .into_iter()
        .filter(|f| category.accepts(f.category()))
        .filter(|f| match &term {
            Some(t) => any_field_matches(
                [
                    Some(f.article()),
                    Some(f.color()),
                    Some(f.description()),
                    f.client_name(),
                ],
                t,
            ),
            None => true,
        })
        .collect()
}

pub fn sort_inventory<T: FabricFields>(items: &mut [T], sort: InventorySort) {
    match sort {
        InventorySort::Recent => items.sort_by(|a, b| b.shipping_date().cmp(&a.shipping_date())),
        InventorySort::Oldest => items.sort_by_key(|f| f.shipping_date()),
    }
}

pub fn sort_client_fabrics<T: FabricFields>(items: &mut [T], sort: ClientFabricSort) {
    match sort {
        ClientFabricSort::DateDesc => {
            items.sort_by(|a, b| b.shipping_date().cmp(&a.shipping_date()))
        }
        ClientFabricSort::DateAsc => items.sort_by_key(|f| f.shipping_date()),
        ClientFabricSort::Article => items.sort_by(|a, b| {
            a.article()
                .to_lowercase()
                .cmp(&b.article().to_lowercase())
                .then_with(|| a.article().cmp(b.article()))
        }),
        ClientFabricSort::Meters => items.sort_by(|a, b| b.meters().total_cmp(&a.meters())),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Totals shown under a fabric list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FabricSummary {
    pub total_records: usize,
    pub total_meters: f64,
    pub fabric_count: usize,
    pub lining_count: usize,
}

pub fn summarize_fabrics<T: FabricFields>(items: &[T]) -> FabricSummary {
    let total_meters: f64 = items.iter().map(FabricFields::meters).sum();
    FabricSummary {
        total_records: items.len(),
        total_meters: round_meters(total_meters),
        fabric_count: items
            .iter()
            .filter(|f| f.category() == CATEGORY_FABRIC)
            .count(),
        lining_count: items
            .iter()
            .filter(|f| f.category() == CATEGORY_LINING)
            .count(),
    }
}

/// Round a meter total to centimeters, hiding float accumulation noise.
pub fn round_meters(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}
