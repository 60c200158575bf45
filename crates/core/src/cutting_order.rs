//! Cutting-order rules.
//!
//! An order ("orden de corte") is composed from a client, a batch of line
//! items (fabric + meters to cut) and a garment/size grid. This module owns
//! the status vocabulary, lot-number generation, the composition checks run
//! before anything is written, and the detail-view summary.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::search::contains_ci;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROCESS: &str = "in_process";
pub const STATUS_COMPLETED: &str = "completed";

const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_IN_PROCESS, STATUS_COMPLETED];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Spanish label shown to the shop floor.
pub fn status_label(status: &str) -> &str {
    match status {
        STATUS_PENDING => "Pendiente",
        STATUS_IN_PROCESS => "En Proceso",
        STATUS_COMPLETED => "Completado",
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Lot numbers
// ---------------------------------------------------------------------------

pub const LOT_PREFIX: &str = "OC";
pub const MAX_LOT_NUMBER_LEN: usize = 64;

/// Build a lot number: `OC` + `YYMMDD` + three random digits.
///
/// ```
/// use progettare_core::cutting_order::generate_lot_number;
///
/// let date = chrono::NaiveDate::from_ymd_opt(2026, 1, 16).unwrap();
/// let lot = generate_lot_number(date, &mut rand::rng());
/// assert!(lot.starts_with("OC260116"));
/// assert_eq!(lot.len(), 11);
/// ```
pub fn generate_lot_number<R: Rng + ?Sized>(date: Date, rng: &mut R) -> String {
    let suffix: u16 = rng.random_range(0..1000);
    format!("{LOT_PREFIX}{}{suffix:03}", date.format("%y%m%d"))
}

/// Lot number for an order created today (UTC).
pub fn suggest_lot_number() -> String {
    generate_lot_number(chrono::Utc::now().date_naive(), &mut rand::rng())
}

pub fn validate_lot_number(lot_number: &str) -> Result<(), CoreError> {
    let lot_number = lot_number.trim();
    if lot_number.is_empty() {
        return Err(CoreError::validation("Lot number is required"));
    }
    if lot_number.chars().count() > MAX_LOT_NUMBER_LEN {
        return Err(CoreError::Validation(format!(
            "Lot number must be at most {MAX_LOT_NUMBER_LEN} characters"
        )));
    }
    Ok(())
}

/// Order search: lot number contains the (lowercased) term.
pub fn lot_number_matches(lot_number: &str, term: &str) -> bool {
    contains_ci(lot_number, term)
}

// ---------------------------------------------------------------------------
// Composition drafts
// ---------------------------------------------------------------------------

/// A fabric to cut, as submitted by the order form.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineDraft {
    pub fabric_id: DbId,
    pub meters: f64,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// One cell of the garment/size grid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SizeDraft {
    pub size: String,
    pub quantity: i32,
}

/// A garment row of the grid with its size breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GarmentDraft {
    pub name: String,
    #[serde(default)]
    pub sizes: Vec<SizeDraft>,
}

pub fn validate_line(line: &LineDraft) -> Result<(), CoreError> {
    crate::fabric::validate_meters(line.meters)
}

/// Size labels must be non-blank and unique within one garment; quantities
/// must not be negative.
pub fn validate_sizes(sizes: &[SizeDraft]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(sizes.len());
    for size in sizes {
        let label = size.size.trim();
        if label.is_empty() {
            return Err(CoreError::validation("Size label is required"));
        }
        if size.quantity < 0 {
            return Err(CoreError::Validation(format!(
                "Quantity for size '{label}' must not be negative"
            )));
        }
        if !seen.insert(label.to_lowercase()) {
            return Err(CoreError::Validation(format!(
                "Size '{label}' appears more than once"
            )));
        }
    }
    Ok(())
}

pub fn validate_garment(garment: &GarmentDraft) -> Result<(), CoreError> {
    if garment.name.trim().is_empty() {
        return Err(CoreError::validation("Garment name is required"));
    }
    validate_sizes(&garment.sizes)
}

/// Structural checks on a new order, run before any fabric lookups.
///
/// - at least one line;
/// - every line valid, and each fabric at most once;
/// - every garment valid.
pub fn validate_composition(
    lines: &[LineDraft],
    garments: &[GarmentDraft],
) -> Result<(), CoreError> {
    if lines.is_empty() {
        return Err(CoreError::validation(
            "A cutting order needs at least one fabric",
        ));
    }
    let mut fabric_ids = HashSet::with_capacity(lines.len());
    for line in lines {
        validate_line(line)?;
        if !fabric_ids.insert(line.fabric_id) {
            return Err(CoreError::Conflict(format!(
                "Fabric {} is already in this cutting order",
                line.fabric_id
            )));
        }
    }
    garments.iter().try_for_each(validate_garment)
}

/// Owner of an active (non-deleted) fabric, as loaded for ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FabricOwnership {
    pub fabric_id: DbId,
    pub client_id: Option<DbId>,
}

/// Every requested fabric must be active and belong to the order's client.
///
/// `active` holds the ownership of those requested fabrics that exist and are
/// not in the recycle bin.
pub fn validate_fabric_ownership(
    client_id: DbId,
    requested: &[DbId],
    active: &[FabricOwnership],
) -> Result<(), CoreError> {
    for fabric_id in requested {
        match active.iter().find(|f| f.fabric_id == *fabric_id) {
            None => {
                return Err(CoreError::Validation(format!(
                    "Fabric {fabric_id} does not exist or is in the recycle bin"
                )))
            }
            Some(f) if f.client_id != Some(client_id) => {
                return Err(CoreError::Validation(format!(
                    "Fabric {fabric_id} does not belong to client {client_id}"
                )))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Read access to a persisted line for summary purposes.
pub trait LineFields {
    fn meters(&self) -> f64;
    fn remarks(&self) -> Option<&str>;
}

/// Totals shown at the bottom of the order detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub line_count: usize,
    pub total_meters: f64,
    pub lines_with_remarks: usize,
    pub garment_count: usize,
    pub total_units: i64,
}

pub fn summarize_order<L, I>(lines: &[L], garment_count: usize, quantities: I) -> OrderSummary
where
    L: LineFields,
    I: IntoIterator<Item = i32>,
{
    OrderSummary {
        line_count: lines.len(),
        total_meters: crate::fabric::round_meters(lines.iter().map(LineFields::meters).sum()),
        lines_with_remarks: lines
            .iter()
            .filter(|l| l.remarks().is_some_and(|r| !r.trim().is_empty()))
            .count(),
        garment_count,
        total_units: quantities.into_iter().map(i64::from).sum(),
    }
}
