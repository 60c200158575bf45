//! Handlers for the `/orders` resource: cutting orders, their exports and
//! share link.
//!
//! Line and garment maintenance lives in [`order_item`](super::order_item).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use progettare_core::cutting_order::{
    lot_number_matches, suggest_lot_number, validate_composition, validate_fabric_ownership,
    validate_lot_number, validate_status,
};
use progettare_core::error::CoreError;
use progettare_core::export::{order_lines_csv, order_message, order_workbook};
use progettare_core::messaging::whatsapp_link;
use progettare_core::search::normalize_term;
use progettare_core::spreadsheet::XLSX_CONTENT_TYPE;
use progettare_core::types::DbId;
use progettare_db::models::cutting_order::{
    CreateCuttingOrder, CuttingOrder, CuttingOrderDetail, CuttingOrderListItem, StatusUpdate,
    UpdateCuttingOrder,
};
use progettare_db::repositories::{CuttingOrderRepo, FabricRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::client::ensure_client_exists;
use crate::middleware::auth::AuthUser;
use crate::query::SearchParams;
use crate::response::file_download;
use crate::state::AppState;

/// Attempts at drawing an unused lot number before giving up.
const LOT_NUMBER_ATTEMPTS: usize = 10;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CuttingOrder",
        id,
    })
}

pub(crate) async fn load_order(state: &AppState, id: DbId) -> AppResult<CuttingOrder> {
    CuttingOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn load_detail(state: &AppState, id: DbId) -> AppResult<CuttingOrderDetail> {
    CuttingOrderRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Every fabric in `fabric_ids` must be active and owned by `client_id`.
pub(crate) async fn check_fabric_ownership(
    state: &AppState,
    client_id: DbId,
    fabric_ids: &[DbId],
) -> AppResult<()> {
    let active = FabricRepo::active_ownership(&state.pool, fabric_ids).await?;
    validate_fabric_ownership(client_id, fabric_ids, &active)?;
    Ok(())
}

fn lot_numbers_exhausted() -> AppError {
    AppError::Core(CoreError::Conflict(
        "Could not generate an unused lot number, enter one manually".into(),
    ))
}

/// A generated lot number not used by any order yet.
async fn unused_lot_number(state: &AppState) -> AppResult<String> {
    for _ in 0..LOT_NUMBER_ATTEMPTS {
        let candidate = suggest_lot_number();
        if !CuttingOrderRepo::lot_number_exists(&state.pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    Err(lot_numbers_exhausted())
}

/// Insert with a generated lot number, drawing a new one whenever a
/// concurrent create took it between the check and the insert.
async fn create_with_generated_lot(
    state: &AppState,
    input: &CreateCuttingOrder,
) -> AppResult<CuttingOrder> {
    for _ in 0..LOT_NUMBER_ATTEMPTS {
        let lot_number = unused_lot_number(state).await?;
        match CuttingOrderRepo::create(&state.pool, &lot_number, input).await {
            Ok(order) => return Ok(order),
            Err(e) if CuttingOrderRepo::is_lot_number_conflict(&e) => {
                tracing::debug!(lot_number = %lot_number, "Generated lot number taken, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(lot_numbers_exhausted())
}

#[derive(Debug, Serialize)]
pub struct LotNumberResponse {
    pub lot_number: String,
}

#[derive(Debug, Serialize)]
pub struct ShareLinkResponse {
    pub url: String,
    pub message: String,
}

/// GET /api/v1/orders?search=
///
/// Newest first; `search` matches the lot number.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<CuttingOrderListItem>>> {
    let mut orders = CuttingOrderRepo::list(&state.pool).await?;
    if let Some(term) = normalize_term(params.search.as_deref()) {
        orders.retain(|o| lot_number_matches(&o.lot_number, &term));
    }
    Ok(Json(orders))
}

/// GET /api/v1/orders/lot-number
pub async fn lot_number(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<LotNumberResponse>> {
    Ok(Json(LotNumberResponse {
        lot_number: unused_lot_number(&state).await?,
    }))
}

/// POST /api/v1/orders
///
/// Composes an order with its lines and garment grid in one transaction.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateCuttingOrder>,
) -> AppResult<(StatusCode, Json<CuttingOrderDetail>)> {
    let input = input.normalized();
    validate_composition(&input.lines, &input.garments)?;
    ensure_client_exists(&state, input.client_id).await?;

    let fabric_ids: Vec<DbId> = input.lines.iter().map(|l| l.fabric_id).collect();
    check_fabric_ownership(&state, input.client_id, &fabric_ids).await?;

    let order = match input.lot_number.as_deref() {
        Some(lot) => {
            validate_lot_number(lot)?;
            CuttingOrderRepo::create(&state.pool, lot, &input).await?
        }
        None => create_with_generated_lot(&state, &input).await?,
    };
    tracing::info!(
        order_id = order.id,
        lot_number = %order.lot_number,
        lines = input.lines.len(),
        garments = input.garments.len(),
        user_id = auth.user_id,
        "Cutting order created",
    );

    let detail = load_detail(&state, order.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/orders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CuttingOrderDetail>> {
    Ok(Json(load_detail(&state, id).await?))
}

/// PUT /api/v1/orders/{id}
///
/// Overwrites lot number, client, status and notes. Existing lines are not
/// re-checked against a new client.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCuttingOrder>,
) -> AppResult<Json<CuttingOrderDetail>> {
    let input = input.normalized()?;
    ensure_client_exists(&state, input.client_id).await?;
    CuttingOrderRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(order_id = id, user_id = auth.user_id, "Cutting order updated");
    Ok(Json(load_detail(&state, id).await?))
}

/// PUT /api/v1/orders/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdate>,
) -> AppResult<Json<CuttingOrder>> {
    validate_status(&input.status)?;
    let order = CuttingOrderRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(
        order_id = id,
        status = %order.status,
        user_id = auth.user_id,
        "Cutting order status changed",
    );
    Ok(Json(order))
}

/// DELETE /api/v1/orders/{id}
///
/// Lines, garments and sizes are removed with the order.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CuttingOrderRepo::delete(&state.pool, id).await? {
        tracing::info!(order_id = id, user_id = auth.user_id, "Cutting order deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/orders/{id}/export.xlsx
pub async fn export_xlsx(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let export = load_detail(&state, id).await?.to_export();
    let bytes = order_workbook(&export).to_xlsx()?;
    Ok(file_download(
        XLSX_CONTENT_TYPE,
        &export.file_name("xlsx"),
        bytes,
    ))
}

/// GET /api/v1/orders/{id}/export.csv
pub async fn export_csv(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let export = load_detail(&state, id).await?.to_export();
    Ok(file_download(
        CSV_CONTENT_TYPE,
        &export.file_name("csv"),
        order_lines_csv(&export),
    ))
}

/// GET /api/v1/orders/{id}/share-link
///
/// WhatsApp link to the client's phone with the order summary prefilled.
pub async fn share_link(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ShareLinkResponse>> {
    let detail = load_detail(&state, id).await?;
    let message = order_message(&detail.to_export());
    let url = whatsapp_link(detail.order.client_phone.as_deref(), &message);
    Ok(Json(ShareLinkResponse { url, message }))
}
