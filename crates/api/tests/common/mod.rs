#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use progettare_api::auth::jwt::{generate_access_token, JwtConfig};
use progettare_api::config::ServerConfig;
use progettare_api::router::build_app_router;
use progettare_api::state::AppState;
use progettare_api::storage::LocalObjectStore;
use progettare_core::roles::{ROLE_ADMIN, ROLE_OPERATOR};
use progettare_db::models::user::CreateUser;
use progettare_db::repositories::UserRepo;

pub const TEST_BASE_URL: &str = "http://test.local";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config(storage_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage_dir: storage_dir.to_path_buf(),
        public_base_url: TEST_BASE_URL.to_string(),
        max_upload_bytes: 1024 * 1024,
        jwt: JwtConfig::with_secret("progettare-integration-test-secret"),
        bootstrap_admin: None,
    }
}

/// Full application router backed by `pool`, storing uploads under a shared
/// temp directory.
pub fn build_test_app(pool: PgPool) -> Router {
    let dir = std::env::temp_dir().join("progettare-api-tests");
    build_test_app_with_storage(pool, &dir)
}

/// Full application router storing uploads under `storage_dir`.
pub fn build_test_app_with_storage(pool: PgPool, storage_dir: &Path) -> Router {
    let config = test_config(storage_dir);
    let store = LocalObjectStore::new(storage_dir, TEST_BASE_URL);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store: Arc::new(store),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with a throwaway hash and return a valid access token.
///
/// Skips Argon2 so tests that only need a caller stay fast; use the login
/// endpoint when the password matters.
pub async fn token_for_role(pool: &PgPool, username: &str, role: &str) -> String {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "unused".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    generate_access_token(user.id, &user.role, &test_config(Path::new("/")).jwt)
        .expect("token generation should succeed")
}

pub async fn admin_token(pool: &PgPool) -> String {
    token_for_role(pool, "admin", ROLE_ADMIN).await
}

pub async fn operator_token(pool: &PgPool) -> String {
    token_for_role(pool, "operator", ROLE_OPERATOR).await
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a client through the API and return its id.
pub async fn create_client(app: Router, token: &str, name: &str, phone: Option<&str>) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/clients",
        token,
        serde_json::json!({ "name": name, "phone": phone }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().expect("client id")
}

/// Create a fabric through the API and return its id.
pub async fn create_fabric(
    app: Router,
    token: &str,
    client_id: Option<i64>,
    article: &str,
    category: &str,
    meters: f64,
    shipping_date: &str,
) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/fabrics",
        token,
        serde_json::json!({
            "article": article,
            "color": "Azul",
            "description": "Gabardina elastizada",
            "meters": meters,
            "shipping_date": shipping_date,
            "category": category,
            "pattern": "plain",
            "client_id": client_id,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().expect("fabric id")
}
