//! Handler for the `/dashboard` landing summary.

use axum::extract::State;
use axum::Json;
use progettare_db::models::dashboard::DashboardSummary;
use progettare_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn summary(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(DashboardRepo::summary(&state.pool).await?))
}
