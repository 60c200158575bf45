//! Route definitions for the `/orders` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{cutting_order, order_item};
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// GET    /                                   -> list (?search=)
/// POST   /                                   -> create
/// GET    /lot-number                         -> lot_number
/// GET    /{id}                               -> get_by_id
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
/// PUT    /{id}/status                        -> set_status
/// GET    /{id}/export.xlsx                   -> export_xlsx
/// GET    /{id}/export.csv                    -> export_csv
/// GET    /{id}/share-link                    -> share_link
/// POST   /{id}/lines                         -> add_line
/// PUT    /{id}/lines/{line_id}               -> update_line
/// DELETE /{id}/lines/{line_id}               -> delete_line
/// POST   /{id}/garments                      -> add_garment
/// DELETE /{id}/garments/{garment_id}         -> delete_garment
/// PUT    /{id}/garments/{garment_id}/sizes   -> replace_sizes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cutting_order::list).post(cutting_order::create))
        .route("/lot-number", get(cutting_order::lot_number))
        .route(
            "/{id}",
            get(cutting_order::get_by_id)
                .put(cutting_order::update)
                .delete(cutting_order::delete),
        )
        .route("/{id}/status", put(cutting_order::set_status))
        .route("/{id}/export.xlsx", get(cutting_order::export_xlsx))
        .route("/{id}/export.csv", get(cutting_order::export_csv))
        .route("/{id}/share-link", get(cutting_order::share_link))
        .route("/{id}/lines", post(order_item::add_line))
        .route(
            "/{id}/lines/{line_id}",
            put(order_item::update_line).delete(order_item::delete_line),
        )
        .route("/{id}/garments", post(order_item::add_garment))
        .route(
            "/{id}/garments/{garment_id}",
            delete(order_item::delete_garment),
        )
        .route(
            "/{id}/garments/{garment_id}/sizes",
            put(order_item::replace_sizes),
        )
}
