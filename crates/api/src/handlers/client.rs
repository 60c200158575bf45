//! Handlers for the `/clients` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use progettare_core::client::client_matches;
use progettare_core::error::CoreError;
use progettare_core::fabric::{
    filter_fabrics, sort_client_fabrics, summarize_fabrics, FabricSummary,
};
use progettare_core::search::normalize_term;
use progettare_core::types::DbId;
use progettare_db::models::client::{Client, ClientInput};
use progettare_db::models::fabric::Fabric;
use progettare_db::repositories::{ClientRepo, FabricRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{ClientFabricParams, SearchParams};
use crate::response::SummarizedList;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Client",
        id,
    })
}

/// Fail with a validation error unless the client exists.
pub(crate) async fn ensure_client_exists(state: &AppState, id: DbId) -> AppResult<Client> {
    ClientRepo::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!("Client {id} does not exist")))
    })
}

/// POST /api/v1/clients
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ClientInput>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let input = input.normalized()?;
    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, user_id = auth.user_id, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/v1/clients?search=
///
/// Ordered by name; `search` matches name or email.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Client>>> {
    let mut clients = ClientRepo::list(&state.pool).await?;
    if let Some(term) = normalize_term(params.search.as_deref()) {
        clients.retain(|c| client_matches(&c.name, c.email.as_deref(), &term));
    }
    Ok(Json(clients))
}

/// GET /api/v1/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(client))
}

/// PUT /api/v1/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ClientInput>,
) -> AppResult<Json<Client>> {
    let input = input.normalized()?;
    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(client_id = id, user_id = auth.user_id, "Client updated");
    Ok(Json(client))
}

/// DELETE /api/v1/clients/{id}
///
/// Fabrics of the client are kept and unlinked. A client with cutting orders
/// cannot be deleted (409).
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, id).await? {
        tracing::info!(client_id = id, user_id = auth.user_id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/clients/{id}/fabrics?search=&category=&sort=
///
/// The client's active fabrics with totals over the filtered list.
pub async fn fabrics(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<ClientFabricParams>,
) -> AppResult<Json<SummarizedList<Fabric, FabricSummary>>> {
    if ClientRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }
    let all = FabricRepo::list_by_client(&state.pool, id).await?;
    let mut data = filter_fabrics(all, params.search.as_deref(), params.category);
    sort_client_fabrics(&mut data, params.sort);
    let summary = summarize_fabrics(&data);
    Ok(Json(SummarizedList { data, summary }))
}
