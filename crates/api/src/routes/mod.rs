pub mod auth;
pub mod client;
pub mod cutting_order;
pub mod dashboard;
pub mod fabric;
pub mod health;
pub mod trash;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout
///
/// /dashboard                                       landing summary
///
/// /clients                                         list, create
/// /clients/{id}                                    get, update, delete
/// /clients/{id}/fabrics                            client fabrics + totals
///
/// /fabrics                                         list, create
/// /fabrics/export                                  inventory .xlsx
/// /fabrics/{id}                                    get, update, soft delete
/// /fabrics/{id}/image                              image upload (multipart)
///
/// /trash                                           list binned fabrics
/// /trash/purge                                     purge all (admin)
/// /trash/{id}/restore                              restore
/// /trash/{id}/purge                                purge one (admin)
///
/// /orders                                          list, create
/// /orders/lot-number                               suggested lot number
/// /orders/{id}                                     get, update, delete
/// /orders/{id}/status                              status-only update
/// /orders/{id}/export.xlsx | export.csv            downloads
/// /orders/{id}/share-link                          WhatsApp deep link
/// /orders/{id}/lines[/{line_id}]                   line maintenance
/// /orders/{id}/garments[/{garment_id}[/sizes]]     garment maintenance
/// ```
///
/// Everything except login and refresh requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/dashboard", dashboard::router())
        .nest("/clients", client::router())
        .nest("/fabrics", fabric::router())
        .nest("/trash", trash::router())
        .nest("/orders", cutting_order::router())
}
