//! HTTP-level tests for cutting orders, their lines and garments, exports
//! and the dashboard.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::Router;
use common::{
    body_bytes, body_json, create_client, create_fabric, delete_auth, get_auth, post_json_auth,
    put_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

struct Fixture {
    app: Router,
    token: String,
    client: i64,
    gabardine: i64,
    lining: i64,
}

async fn fixture(pool: PgPool) -> Fixture {
    let token = common::operator_token(&pool).await;
    let app = common::build_test_app(pool);
    let client = create_client(app.clone(), &token, "Textil Norte", Some("(011) 4555-1234")).await;
    let gabardine =
        create_fabric(app.clone(), &token, Some(client), "GAB-1", "fabric", 20.0, "2026-01-01").await;
    let lining =
        create_fabric(app.clone(), &token, Some(client), "FOR-1", "lining", 10.0, "2026-01-02").await;
    Fixture {
        app,
        token,
        client,
        gabardine,
        lining,
    }
}

fn order_body(f: &Fixture, lot_number: Option<&str>) -> Value {
    json!({
        "client_id": f.client,
        "lot_number": lot_number,
        "notes": "  Entregar el lunes ",
        "lines": [
            { "fabric_id": f.gabardine, "meters": 12.5, "remarks": "corte recto" },
            { "fabric_id": f.lining, "meters": 4.0, "remarks": "  " },
        ],
        "garments": [
            { "name": "Pantalón", "sizes": [
                { "size": "38", "quantity": 10 },
                { "size": " 40 ", "quantity": 5 },
            ]},
            { "name": "Saco", "sizes": [] },
        ],
    })
}

async fn create_order(f: &Fixture, lot_number: Option<&str>) -> Value {
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, order_body(f, lot_number)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_composes_an_order_with_its_grid(pool: PgPool) {
    let f = fixture(pool).await;
    let json = create_order(&f, None).await;

    assert!(json["lot_number"].as_str().unwrap().starts_with("OC"));
    assert_eq!(json["client_name"], "Textil Norte");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["notes"], "Entregar el lunes");
    assert_eq!(json["lines"].as_array().unwrap().len(), 2);
    assert_eq!(json["garments"].as_array().unwrap().len(), 2);

    let summary = &json["summary"];
    assert_eq!(summary["line_count"], 2);
    assert_eq!(summary["total_meters"], 16.5);
    assert_eq!(summary["lines_with_remarks"], 1);
    assert_eq!(summary["garment_count"], 2);
    assert_eq!(summary["total_units"], 15);

    let pants = json["garments"]
        .as_array()
        .unwrap()
        .iter()
        .find(|g| g["name"] == "Pantalón")
        .unwrap();
    let sizes: Vec<&str> = pants["sizes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["size"].as_str().unwrap())
        .collect();
    assert!(sizes.contains(&"40"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_invalid_compositions(pool: PgPool) {
    let f = fixture(pool).await;
    let other = create_client(f.app.clone(), &f.token, "Otro Cliente", None).await;
    let foreign =
        create_fabric(f.app.clone(), &f.token, Some(other), "AJE-1", "fabric", 3.0, "2026-01-01").await;

    let mut body = order_body(&f, None);
    body["lines"] = json!([]);
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = order_body(&f, None);
    body["lines"] = json!([{ "fabric_id": foreign, "meters": 1.0 }]);
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = order_body(&f, None);
    body["lines"] = json!([
        { "fabric_id": f.gabardine, "meters": 1.0 },
        { "fabric_id": f.gabardine, "meters": 2.0 },
    ]);
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let mut body = order_body(&f, None);
    body["garments"] = json!([{ "name": "Saco", "sizes": [
        { "size": "M", "quantity": 1 },
        { "size": "M", "quantity": 2 },
    ]}]);
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Binned fabrics cannot be cut.
    delete_auth(f.app.clone(), &format!("/api/v1/fabrics/{}", f.lining), &f.token).await;
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, order_body(&f, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get_auth(f.app, "/api/v1/orders", &f.token).await).await;
    assert!(json.as_array().unwrap().is_empty(), "nothing was persisted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lot_numbers_are_unique(pool: PgPool) {
    let f = fixture(pool).await;

    let json = body_json(get_auth(f.app.clone(), "/api/v1/orders/lot-number", &f.token).await).await;
    let suggested = json["lot_number"].as_str().unwrap();
    assert!(suggested.starts_with("OC"));
    assert_eq!(suggested.len(), 11);

    create_order(&f, Some("LOTE-7")).await;

    let mut body = order_body(&f, Some("LOTE-7"));
    body["lines"] = json!([{ "fabric_id": f.gabardine, "meters": 1.0 }]);
    body["garments"] = json!([]);
    let response = post_json_auth(f.app, "/api/v1/orders", &f.token, body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_creates_get_distinct_generated_lots(pool: PgPool) {
    let f = fixture(pool).await;
    let post = || post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, order_body(&f, None));

    let (a, b, c, d) = tokio::join!(post(), post(), post(), post());
    let mut lots = Vec::new();
    for response in [a, b, c, d] {
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        lots.push(json["lot_number"].as_str().unwrap().to_string());
    }
    lots.sort();
    lots.dedup();
    assert_eq!(lots.len(), 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_searchable_by_lot_number(pool: PgPool) {
    let f = fixture(pool).await;
    create_order(&f, Some("LOTE-A1")).await;
    let mut body = order_body(&f, Some("OTRO-B2"));
    body["lines"] = json!([{ "fabric_id": f.gabardine, "meters": 1.0 }]);
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get_auth(f.app.clone(), "/api/v1/orders", &f.token).await).await;
    let orders = json.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["lot_number"], "OTRO-B2", "newest first");
    assert_eq!(orders[1]["line_count"], 2);
    assert_eq!(orders[1]["total_meters"], 16.5);

    let json = body_json(get_auth(f.app, "/api/v1/orders?search=lote", &f.token).await).await;
    let orders = json.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["lot_number"], "LOTE-A1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn header_and_status_updates(pool: PgPool) {
    let f = fixture(pool).await;
    let id = create_order(&f, Some("LOTE-1")).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/orders/{id}");

    let response = put_json_auth(
        f.app.clone(),
        &uri,
        &f.token,
        json!({ "lot_number": " LOTE-1B ", "client_id": f.client, "status": "in_process", "notes": null }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["lot_number"], "LOTE-1B");
    assert_eq!(json["status"], "in_process");
    assert!(json["notes"].is_null());
    assert_eq!(json["lines"].as_array().unwrap().len(), 2);

    let response = put_json_auth(
        f.app.clone(),
        &format!("{uri}/status"),
        &f.token,
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "completed");

    let response = put_json_auth(
        f.app.clone(),
        &format!("{uri}/status"),
        &f.token,
        json!({ "status": "cancelled" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        f.app,
        "/api/v1/orders/999999/status",
        &f.token,
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lines_can_be_added_updated_and_removed(pool: PgPool) {
    let f = fixture(pool).await;
    let mut body = order_body(&f, None);
    body["lines"] = json!([{ "fabric_id": f.gabardine, "meters": 1.0 }]);
    let response = post_json_auth(f.app.clone(), "/api/v1/orders", &f.token, body).await;
    let id = body_json(response).await["id"].as_i64().unwrap();
    let lines_uri = format!("/api/v1/orders/{id}/lines");

    let response = post_json_auth(
        f.app.clone(),
        &lines_uri,
        &f.token,
        json!({ "fabric_id": f.lining, "meters": 3.5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let line_id = body_json(response).await["id"].as_i64().unwrap();

    // Same fabric twice.
    let response = post_json_auth(
        f.app.clone(),
        &lines_uri,
        &f.token,
        json!({ "fabric_id": f.lining, "meters": 1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        f.app.clone(),
        &format!("{lines_uri}/{line_id}"),
        &f.token,
        json!({ "meters": 6.0, "remarks": "con orillo" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["meters"], 6.0);
    assert_eq!(json["remarks"], "con orillo");

    let response = put_json_auth(
        f.app.clone(),
        &format!("{lines_uri}/{line_id}"),
        &f.token,
        json!({ "meters": -1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = delete_auth(f.app.clone(), &format!("{lines_uri}/{line_id}"), &f.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(f.app.clone(), &format!("{lines_uri}/{line_id}"), &f.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(get_auth(f.app, &format!("/api/v1/orders/{id}"), &f.token).await).await;
    assert_eq!(json["summary"]["line_count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garments_and_sizes_can_be_maintained(pool: PgPool) {
    let f = fixture(pool).await;
    let id = create_order(&f, None).await["id"].as_i64().unwrap();
    let garments_uri = format!("/api/v1/orders/{id}/garments");

    let response = post_json_auth(
        f.app.clone(),
        &garments_uri,
        &f.token,
        json!({ "name": " Chaleco ", "sizes": [{ "size": "S", "quantity": 2 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Chaleco");
    let garment_id = json["id"].as_i64().unwrap();

    let response = put_json_auth(
        f.app.clone(),
        &format!("{garments_uri}/{garment_id}/sizes"),
        &f.token,
        json!({ "sizes": [
            { "size": "M", "quantity": 4 },
            { "size": "L", "quantity": 6 },
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["sizes"].as_array().unwrap().len(), 2);

    let response = put_json_auth(
        f.app.clone(),
        &format!("{garments_uri}/{garment_id}/sizes"),
        &f.token,
        json!({ "sizes": [{ "size": "M", "quantity": -1 }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let detail = body_json(get_auth(f.app.clone(), &format!("/api/v1/orders/{id}"), &f.token).await).await;
    assert_eq!(detail["summary"]["garment_count"], 3);
    assert_eq!(detail["summary"]["total_units"], 25);

    let response = delete_auth(f.app.clone(), &format!("{garments_uri}/{garment_id}"), &f.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A garment of another order is not reachable through this one.
    let response = put_json_auth(
        f.app,
        &format!("/api/v1/orders/{}/garments/{garment_id}/sizes", id + 1000),
        &f.token,
        json!({ "sizes": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn exports_and_share_link(pool: PgPool) {
    let f = fixture(pool).await;
    let id = create_order(&f, Some("LOTE-9")).await["id"].as_i64().unwrap();

    let response = get_auth(f.app.clone(), &format!("/api/v1/orders/{id}/export.xlsx"), &f.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = response.headers()[CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.contains("orden_LOTE-9.xlsx"));
    assert_eq!(&body_bytes(response).await[..2], b"PK");

    let response = get_auth(f.app.clone(), &format!("/api/v1/orders/{id}/export.csv"), &f.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/csv; charset=utf-8");
    let csv = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(csv.contains("GAB-1"));
    assert!(csv.contains("FOR-1"));

    let response = get_auth(f.app.clone(), &format!("/api/v1/orders/{id}/share-link"), &f.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["url"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/01145551234?text="));
    assert!(json["message"].as_str().unwrap().contains("LOTE-9"));

    let response = get_auth(f.app, "/api/v1/orders/999999/export.csv", &f.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_orders_and_their_clients(pool: PgPool) {
    let f = fixture(pool).await;
    let id = create_order(&f, None).await["id"].as_i64().unwrap();

    // The client still has an order.
    let response = delete_auth(f.app.clone(), &format!("/api/v1/clients/{}", f.client), &f.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_auth(f.app.clone(), &format!("/api/v1/orders/{id}"), &f.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get_auth(f.app.clone(), &format!("/api/v1/orders/{id}"), &f.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(f.app, &format!("/api/v1/clients/{}", f.client), &f.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_counts_everything(pool: PgPool) {
    let f = fixture(pool).await;
    create_order(&f, None).await;
    delete_auth(f.app.clone(), &format!("/api/v1/fabrics/{}", f.lining), &f.token).await;

    let response = get_auth(f.app, "/api/v1/dashboard", &f.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["client_count"], 1);
    assert_eq!(json["active_fabric_count"], 1);
    assert_eq!(json["order_count"], 1);
    assert_eq!(json["orders_by_status"][0]["status"], "pending");
    assert_eq!(json["orders_by_status"][0]["count"], 1);
    assert_eq!(json["recent_shipments"][0]["article"], "GAB-1");
}
