//! Integration tests for fabric soft-delete, restore and purge.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted fabrics are hidden from `find_by_id` and every listing
//! - Restoring a fabric makes it visible again
//! - Purge removes binned fabrics only, and never ones used by an order line
//! - Soft-delete is idempotent (second call returns `false`)

use chrono::NaiveDate;
use progettare_core::cutting_order::LineDraft;
use progettare_db::models::client::ClientInput;
use progettare_db::models::cutting_order::CreateCuttingOrder;
use progettare_db::models::fabric::{FabricInput, PurgedFabric};
use progettare_db::repositories::{ClientRepo, CuttingOrderRepo, FabricRepo, TrashRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_fabric(article: &str, client_id: Option<i64>) -> FabricInput {
    FabricInput {
        article: article.to_string(),
        color: "Negro".to_string(),
        description: "Gabardina".to_string(),
        meters: 25.0,
        shipping_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        category: "fabric".to_string(),
        pattern: "plain".to_string(),
        client_id,
        new_client_name: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_and_restore_shows(pool: PgPool) {
    let fabric = FabricRepo::create(&pool, &new_fabric("GAB-1", None))
        .await
        .unwrap();

    assert!(FabricRepo::soft_delete(&pool, fabric.id).await.unwrap());
    assert!(FabricRepo::find_by_id(&pool, fabric.id).await.unwrap().is_none());
    assert!(FabricRepo::list_active(&pool).await.unwrap().is_empty());
    assert_eq!(FabricRepo::count_active(&pool).await.unwrap(), 0);

    let binned = FabricRepo::find_by_id_include_deleted(&pool, fabric.id)
        .await
        .unwrap()
        .unwrap();
    assert!(binned.deleted_at.is_some());

    let trash = TrashRepo::list_trashed(&pool).await.unwrap();
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].article, "GAB-1");

    assert!(FabricRepo::restore(&pool, fabric.id).await.unwrap());
    assert!(FabricRepo::find_by_id(&pool, fabric.id).await.unwrap().is_some());
    assert!(TrashRepo::list_trashed(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let fabric = FabricRepo::create(&pool, &new_fabric("GAB-2", None))
        .await
        .unwrap();

    assert!(FabricRepo::soft_delete(&pool, fabric.id).await.unwrap());
    assert!(!FabricRepo::soft_delete(&pool, fabric.id).await.unwrap());
    assert!(FabricRepo::restore(&pool, fabric.id).await.unwrap());
    assert!(!FabricRepo::restore(&pool, fabric.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_fabric_cannot_be_updated(pool: PgPool) {
    let fabric = FabricRepo::create(&pool, &new_fabric("GAB-3", None))
        .await
        .unwrap();
    FabricRepo::soft_delete(&pool, fabric.id).await.unwrap();

    let updated = FabricRepo::update(&pool, fabric.id, &new_fabric("GAB-3b", None))
        .await
        .unwrap();
    assert!(updated.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_one_only_touches_binned_rows(pool: PgPool) {
    let fabric = FabricRepo::create(&pool, &new_fabric("GAB-4", None))
        .await
        .unwrap();

    assert!(TrashRepo::purge_one(&pool, fabric.id).await.unwrap().is_none());

    FabricRepo::set_image_url(&pool, fabric.id, "/media/fabric-images/gab-4.png")
        .await
        .unwrap();
    FabricRepo::soft_delete(&pool, fabric.id).await.unwrap();
    let purged: PurgedFabric = TrashRepo::purge_one(&pool, fabric.id).await.unwrap().unwrap();
    assert_eq!(purged.id, fabric.id);
    assert_eq!(purged.image_url.as_deref(), Some("/media/fabric-images/gab-4.png"));
    assert!(FabricRepo::find_by_id_include_deleted(&pool, fabric.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_purge_skips_fabrics_used_by_orders(pool: PgPool) {
    let client = ClientRepo::create(&pool, &ClientInput::named("Textil Norte"))
        .await
        .unwrap();
    let used = FabricRepo::create(&pool, &new_fabric("USED", Some(client.id)))
        .await
        .unwrap();
    let loose = FabricRepo::create(&pool, &new_fabric("LOOSE", None))
        .await
        .unwrap();

    let order = CreateCuttingOrder {
        client_id: client.id,
        lot_number: None,
        creation_date: None,
        notes: None,
        lines: vec![LineDraft {
            fabric_id: used.id,
            meters: 3.0,
            remarks: None,
        }],
        garments: vec![],
    };
    CuttingOrderRepo::create(&pool, "OC-PURGE", &order).await.unwrap();

    FabricRepo::soft_delete(&pool, used.id).await.unwrap();
    FabricRepo::soft_delete(&pool, loose.id).await.unwrap();

    // Referenced by an order line: the single purge is refused by the FK.
    let err = TrashRepo::purge_one(&pool, used.id).await.unwrap_err();
    let code = err.as_database_error().and_then(|e| e.code()).unwrap();
    assert_eq!(code, "23503");

    let purged = TrashRepo::purge_all(&pool).await.unwrap();
    assert_eq!(purged.len(), 1);
    assert_eq!(purged[0].id, loose.id);
    assert_eq!(TrashRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_client_unlinks_fabrics(pool: PgPool) {
    let client = ClientRepo::create(&pool, &ClientInput::named("Efímero"))
        .await
        .unwrap();
    let fabric = FabricRepo::create(&pool, &new_fabric("GAB-5", Some(client.id)))
        .await
        .unwrap();

    assert!(ClientRepo::delete(&pool, client.id).await.unwrap());

    let fabric = FabricRepo::find_by_id(&pool, fabric.id).await.unwrap().unwrap();
    assert_eq!(fabric.client_id, None);
}
