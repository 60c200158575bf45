//! `/auth`: sign-in and token rotation.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /login    {username, password}   -> tokens (public)
/// POST /refresh  {refresh_token}        -> rotated tokens (public)
/// POST /logout                          -> 204, revokes every session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
