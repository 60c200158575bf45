//! Route definitions for the `/trash` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::trash;
use crate::state::AppState;

/// Routes mounted at `/trash`.
///
/// ```text
/// GET    /               -> list_trashed (?search=)
/// DELETE /purge          -> purge_all   (admin)
/// POST   /{id}/restore   -> restore
/// DELETE /{id}/purge     -> purge_one   (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trash::list_trashed))
        .route("/purge", delete(trash::purge_all))
        .route("/{id}/restore", post(trash::restore))
        .route("/{id}/purge", delete(trash::purge_one))
}
