//! Handlers for the `/fabrics` resource (active inventory).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use progettare_core::error::CoreError;
use progettare_core::export::{inventory_workbook, InventoryExport};
use progettare_core::fabric::{filter_fabrics, sort_inventory};
use progettare_core::images::{
    content_type_for, image_object_key, validate_image_upload, FABRIC_IMAGES_BUCKET,
};
use progettare_core::spreadsheet::XLSX_CONTENT_TYPE;
use progettare_core::types::DbId;
use progettare_db::models::fabric::{Fabric, FabricInput, FabricListItem};
use progettare_db::repositories::FabricRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::client::ensure_client_exists;
use crate::middleware::auth::AuthUser;
use crate::query::InventoryParams;
use crate::response::file_download;
use crate::state::AppState;
use crate::storage::key_from_url;

/// Download name of the inventory export.
pub const INVENTORY_EXPORT_FILE: &str = "inventario_telas.xlsx";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Fabric",
        id,
    })
}

/// Active inventory with the list filters applied.
async fn filtered_inventory(
    state: &AppState,
    params: &InventoryParams,
) -> AppResult<Vec<FabricListItem>> {
    let all = FabricRepo::list_active(&state.pool).await?;
    let mut items = filter_fabrics(all, params.search.as_deref(), params.category);
    sort_inventory(&mut items, params.sort);
    Ok(items)
}

/// Validate the input and check the linked client, if any, exists.
async fn prepare_input(state: &AppState, input: &FabricInput) -> AppResult<FabricInput> {
    let input = input.normalized()?;
    if let Some(client_id) = input.client_id {
        ensure_client_exists(state, client_id).await?;
    }
    Ok(input)
}

/// Best-effort removal of a stored image; failures are only logged.
pub(crate) async fn remove_stored_image(state: &AppState, url: &str) {
    let Some(key) = key_from_url(url) else {
        return;
    };
    if let Err(e) = state.store.delete(FABRIC_IMAGES_BUCKET, key).await {
        tracing::warn!(error = %e, key, "Failed to remove stored image");
    }
}

/// POST /api/v1/fabrics
///
/// With `new_client_name` (and no `client_id`) the client is created in the
/// same transaction.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<FabricInput>,
) -> AppResult<(StatusCode, Json<Fabric>)> {
    let input = prepare_input(&state, &input).await?;
    let fabric = FabricRepo::create(&state.pool, &input).await?;
    tracing::info!(
        fabric_id = fabric.id,
        client_id = ?fabric.client_id,
        user_id = auth.user_id,
        "Fabric created",
    );
    Ok((StatusCode::CREATED, Json(fabric)))
}

/// GET /api/v1/fabrics?search=&category=&sort=
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<InventoryParams>,
) -> AppResult<Json<Vec<FabricListItem>>> {
    Ok(Json(filtered_inventory(&state, &params).await?))
}

/// GET /api/v1/fabrics/export?search=&category=&sort=
///
/// The (filtered) inventory as an `.xlsx` workbook.
pub async fn export(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<InventoryParams>,
) -> AppResult<Response> {
    let items = filtered_inventory(&state, &params).await?;
    let rows: Vec<InventoryExport> = items.iter().map(InventoryExport::from).collect();
    let bytes = inventory_workbook(&rows).to_xlsx()?;
    Ok(file_download(XLSX_CONTENT_TYPE, INVENTORY_EXPORT_FILE, bytes))
}

/// GET /api/v1/fabrics/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Fabric>> {
    let fabric = FabricRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(fabric))
}

/// PUT /api/v1/fabrics/{id}
///
/// Full overwrite of the editable fields; the image is kept.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<FabricInput>,
) -> AppResult<Json<Fabric>> {
    let input = prepare_input(&state, &input).await?;
    let fabric = FabricRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(fabric_id = id, user_id = auth.user_id, "Fabric updated");
    Ok(Json(fabric))
}

/// DELETE /api/v1/fabrics/{id}
///
/// Soft delete: the fabric moves to the recycle bin.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if FabricRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(fabric_id = id, user_id = auth.user_id, "Fabric moved to recycle bin");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/fabrics/{id}/image
///
/// Multipart upload with a single `file` field. The previous image, if any,
/// is removed from the store once the new one is linked.
pub async fn upload_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<Fabric>> {
    let existing = FabricRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((filename, data.to_vec()));
    }
    let (filename, data) =
        upload.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;

    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Image exceeds the {} byte limit",
            state.config.max_upload_bytes
        ))));
    }
    let ext = validate_image_upload(&filename, &data)?;

    let key = image_object_key(&ext);
    state
        .store
        .put(FABRIC_IMAGES_BUCKET, &key, data, content_type_for(&ext))
        .await?;
    let url = state.store.public_url(FABRIC_IMAGES_BUCKET, &key);

    let Some(fabric) = FabricRepo::set_image_url(&state.pool, id, &url).await? else {
        // Binned while uploading: drop the orphaned object.
        remove_stored_image(&state, &url).await;
        return Err(not_found(id));
    };
    if let Some(previous) = existing.image_url.as_deref() {
        remove_stored_image(&state, previous).await;
    }

    tracing::info!(fabric_id = id, key = %key, user_id = auth.user_id, "Fabric image uploaded");
    Ok(Json(fabric))
}
