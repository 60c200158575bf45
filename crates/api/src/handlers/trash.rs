//! Handlers for the `/trash` resource: the fabric recycle bin.
//!
//! Listing and restoring are open to any signed-in user; permanent deletion
//! requires an admin.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use progettare_core::error::CoreError;
use progettare_core::fabric::{filter_fabrics, CategoryFilter};
use progettare_core::types::DbId;
use progettare_db::models::fabric::{Fabric, PurgedFabric, TrashedFabric};
use progettare_db::repositories::{FabricRepo, TrashRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::fabric::remove_stored_image;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::CountResponse;
use crate::state::AppState;

fn not_in_bin(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "TrashedFabric",
        id,
    })
}

async fn remove_images(state: &AppState, purged: &[PurgedFabric]) {
    for url in purged.iter().filter_map(|p| p.image_url.as_deref()) {
        remove_stored_image(state, url).await;
    }
}

/// GET /api/v1/trash?search=
///
/// Binned fabrics, most recently deleted first.
pub async fn list_trashed(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<TrashedFabric>>> {
    let all = TrashRepo::list_trashed(&state.pool).await?;
    Ok(Json(filter_fabrics(
        all,
        params.search.as_deref(),
        CategoryFilter::All,
    )))
}

/// POST /api/v1/trash/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Fabric>> {
    if !FabricRepo::restore(&state.pool, id).await? {
        return Err(not_in_bin(id));
    }
    tracing::info!(fabric_id = id, user_id = auth.user_id, "Fabric restored");
    let fabric = FabricRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_in_bin(id))?;
    Ok(Json(fabric))
}

/// DELETE /api/v1/trash/{id}/purge
///
/// 409 when an order line still cuts this fabric.
pub async fn purge_one(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let purged = TrashRepo::purge_one(&state.pool, id)
        .await?
        .ok_or_else(|| not_in_bin(id))?;
    remove_images(&state, std::slice::from_ref(&purged)).await;
    tracing::info!(fabric_id = id, user_id = admin.user_id, "Fabric purged");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/trash/purge
///
/// Purges every binned fabric no order line refers to; the rest stay binned.
pub async fn purge_all(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<CountResponse>> {
    let purged = TrashRepo::purge_all(&state.pool).await?;
    remove_images(&state, &purged).await;
    let kept = TrashRepo::count(&state.pool).await?;
    tracing::info!(
        purged = purged.len(),
        kept,
        user_id = admin.user_id,
        "Recycle bin purged",
    );
    Ok(Json(CountResponse {
        count: purged.len(),
    }))
}
