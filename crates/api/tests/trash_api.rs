//! HTTP-level tests for the fabric recycle bin.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_client, create_fabric, delete_auth, get_auth, post_auth, post_json_auth,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn binned_fabrics_are_listed_and_searchable(pool: PgPool) {
    let token = common::operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let client = create_client(app.clone(), &token, "Textil Norte", None).await;
    let a = create_fabric(app.clone(), &token, Some(client), "GAB-1", "fabric", 2.0, "2026-01-01").await;
    let b = create_fabric(app.clone(), &token, None, "FOR-1", "lining", 3.0, "2026-01-02").await;
    create_fabric(app.clone(), &token, None, "KEEP-1", "fabric", 1.0, "2026-01-03").await;

    for id in [a, b] {
        let response = delete_auth(app.clone(), &format!("/api/v1/fabrics/{id}"), &token).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let json = body_json(get_auth(app.clone(), "/api/v1/trash", &token).await).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|f| f["deleted_at"].is_string()));

    let json = body_json(get_auth(app, "/api/v1/trash?search=norte", &token).await).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["article"], "GAB-1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn restore_brings_a_fabric_back(pool: PgPool) {
    let token = common::operator_token(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_fabric(app.clone(), &token, None, "GAB-1", "fabric", 2.0, "2026-01-01").await;

    // Not in the bin yet.
    let response = post_auth(app.clone(), &format!("/api/v1/trash/{id}/restore"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    delete_auth(app.clone(), &format!("/api/v1/fabrics/{id}"), &token).await;
    let response = post_auth(app.clone(), &format!("/api/v1/trash/{id}/restore"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["deleted_at"].is_null());

    let response = get_auth(app.clone(), &format!("/api/v1/fabrics/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(get_auth(app, "/api/v1/trash", &token).await).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn purging_requires_an_admin(pool: PgPool) {
    let operator = common::operator_token(&pool).await;
    let admin = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let id = create_fabric(app.clone(), &operator, None, "GAB-1", "fabric", 2.0, "2026-01-01").await;
    delete_auth(app.clone(), &format!("/api/v1/fabrics/{id}"), &operator).await;

    let response = delete_auth(app.clone(), &format!("/api/v1/trash/{id}/purge"), &operator).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = delete_auth(app.clone(), "/api/v1/trash/purge", &operator).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/v1/trash/{id}/purge"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone for good: neither restorable nor purgeable again.
    let response = post_auth(app.clone(), &format!("/api/v1/trash/{id}/restore"), &operator).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete_auth(app, &format!("/api/v1/trash/{id}/purge"), &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn fabrics_cut_by_an_order_cannot_be_purged(pool: PgPool) {
    let operator = common::operator_token(&pool).await;
    let admin = common::admin_token(&pool).await;
    let app = common::build_test_app(pool);

    let client = create_client(app.clone(), &operator, "Textil Norte", None).await;
    let used = create_fabric(app.clone(), &operator, Some(client), "GAB-1", "fabric", 5.0, "2026-01-01").await;
    let free = create_fabric(app.clone(), &operator, Some(client), "GAB-2", "fabric", 5.0, "2026-01-02").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/orders",
        &operator,
        serde_json::json!({
            "client_id": client,
            "lines": [{ "fabric_id": used, "meters": 2.0 }],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    for id in [used, free] {
        delete_auth(app.clone(), &format!("/api/v1/fabrics/{id}"), &operator).await;
    }

    let response = delete_auth(app.clone(), &format!("/api/v1/trash/{used}/purge"), &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_auth(app.clone(), "/api/v1/trash/purge", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], 1);

    // The referenced fabric stays in the bin.
    let json = body_json(get_auth(app, "/api/v1/trash", &operator).await).await;
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], used);
}
