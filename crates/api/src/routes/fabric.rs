//! Route definitions for the `/fabrics` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::fabric;
use crate::state::AppState;

/// Routes mounted at `/fabrics`.
///
/// ```text
/// GET    /             -> list (?search=&category=&sort=)
/// POST   /             -> create
/// GET    /export       -> export (.xlsx)
/// GET    /{id}         -> get_by_id
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete (to recycle bin)
/// POST   /{id}/image   -> upload_image (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fabric::list).post(fabric::create))
        .route("/export", get(fabric::export))
        .route(
            "/{id}",
            get(fabric::get_by_id)
                .put(fabric::update)
                .delete(fabric::delete),
        )
        .route("/{id}/image", post(fabric::upload_image))
}
