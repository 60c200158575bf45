//! Handlers for the lines and garments of an existing cutting order.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use progettare_core::client::normalize_optional;
use progettare_core::cutting_order::{
    validate_garment, validate_line, validate_sizes, GarmentDraft, LineDraft,
};
use progettare_core::error::CoreError;
use progettare_core::fabric::validate_meters;
use progettare_core::types::DbId;
use progettare_db::models::cutting_order::{
    trim_sizes, CuttingOrderLine, GarmentWithSizes, ReplaceSizes, UpdateOrderLine,
};
use progettare_db::repositories::{GarmentRepo, OrderLineRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::cutting_order::{check_fabric_ownership, load_order};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn line_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "CuttingOrderLine",
        id,
    })
}

fn garment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Garment",
        id,
    })
}

/// POST /api/v1/orders/{id}/lines
///
/// The fabric must be active and belong to the order's client; a fabric
/// already in the order is a 409.
pub async fn add_line(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<DbId>,
    Json(input): Json<LineDraft>,
) -> AppResult<(StatusCode, Json<CuttingOrderLine>)> {
    let order = load_order(&state, order_id).await?;
    let line = LineDraft {
        remarks: normalize_optional(input.remarks.as_deref()),
        ..input
    };
    validate_line(&line)?;
    check_fabric_ownership(&state, order.client_id, &[line.fabric_id]).await?;

    let created = OrderLineRepo::create(&state.pool, order_id, &line).await?;
    tracing::info!(
        order_id,
        line_id = created.id,
        fabric_id = created.fabric_id,
        user_id = auth.user_id,
        "Order line added",
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/orders/{id}/lines/{line_id}
pub async fn update_line(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((order_id, line_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateOrderLine>,
) -> AppResult<Json<CuttingOrderLine>> {
    validate_meters(input.meters)?;
    let input = UpdateOrderLine {
        meters: input.meters,
        remarks: normalize_optional(input.remarks.as_deref()),
    };
    let line = OrderLineRepo::update(&state.pool, order_id, line_id, &input)
        .await?
        .ok_or_else(|| line_not_found(line_id))?;
    tracing::info!(order_id, line_id, user_id = auth.user_id, "Order line updated");
    Ok(Json(line))
}

/// DELETE /api/v1/orders/{id}/lines/{line_id}
pub async fn delete_line(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((order_id, line_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if OrderLineRepo::delete(&state.pool, order_id, line_id).await? {
        tracing::info!(order_id, line_id, user_id = auth.user_id, "Order line removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(line_not_found(line_id))
    }
}

/// POST /api/v1/orders/{id}/garments
pub async fn add_garment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(order_id): Path<DbId>,
    Json(input): Json<GarmentDraft>,
) -> AppResult<(StatusCode, Json<GarmentWithSizes>)> {
    load_order(&state, order_id).await?;
    let garment = GarmentDraft {
        name: input.name.trim().to_string(),
        sizes: trim_sizes(&input.sizes),
    };
    validate_garment(&garment)?;

    let created = GarmentRepo::create(&state.pool, order_id, &garment).await?;
    tracing::info!(
        order_id,
        garment_id = created.garment.id,
        user_id = auth.user_id,
        "Garment added",
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/v1/orders/{id}/garments/{garment_id}/sizes
///
/// Replaces the whole size breakdown of the garment.
pub async fn replace_sizes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((order_id, garment_id)): Path<(DbId, DbId)>,
    Json(input): Json<ReplaceSizes>,
) -> AppResult<Json<GarmentWithSizes>> {
    let garment = GarmentRepo::find_by_id(&state.pool, order_id, garment_id)
        .await?
        .ok_or_else(|| garment_not_found(garment_id))?;
    let sizes = trim_sizes(&input.sizes);
    validate_sizes(&sizes)?;

    let sizes = GarmentRepo::replace_sizes(&state.pool, garment_id, &sizes).await?;
    tracing::info!(
        order_id,
        garment_id,
        sizes = sizes.len(),
        user_id = auth.user_id,
        "Garment sizes replaced",
    );
    Ok(Json(GarmentWithSizes { garment, sizes }))
}

/// DELETE /api/v1/orders/{id}/garments/{garment_id}
pub async fn delete_garment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((order_id, garment_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if GarmentRepo::delete(&state.pool, order_id, garment_id).await? {
        tracing::info!(order_id, garment_id, user_id = auth.user_id, "Garment removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(garment_not_found(garment_id))
    }
}
