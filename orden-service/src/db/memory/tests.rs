use super::*;
use crate::ports::{
    CartRepository, OrdenDetailsRepository, OrdenRepository, OrdenStatusRepository,
};
use chrono::Duration;
use shared::orden::{OrdenStatusType, OrdenType};

fn details_v(orden_id: Uuid, version: i32) -> OrdenDetails {
    OrdenDetails {
        id: Uuid::new_v4(),
        orden_id,
        version,
        restaurant_branch_id: Uuid::new_v4(),
        supplier_unit_id: Uuid::new_v4(),
        cart_id: Uuid::new_v4(),
        delivery_date: None,
        delivery_time: None,
        delivery_type: None,
        subtotal: 0.0,
        subtotal_without_tax: 0.0,
        tax: 0.0,
        shipping_cost: 0.0,
        packaging_cost: 0.0,
        service_fee: 0.0,
        total: 0.0,
        payment_method: None,
        comments: None,
        approved_by: None,
        created_by: Uuid::nil(),
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn test_latest_details_is_max_version() {
    let store = MemoryStore::new();
    let orden_id = Uuid::new_v4();
    for v in [1, 3, 2] {
        OrdenDetailsRepository::new(&store, &details_v(orden_id, v))
            .await
            .unwrap();
    }
    let last = OrdenDetailsRepository::get_last(&store, orden_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last.version, 3);
    assert_eq!(store.details_history(orden_id).len(), 3);
}

#[tokio::test]
async fn test_duplicate_details_version_rejected() {
    let store = MemoryStore::new();
    let orden_id = Uuid::new_v4();
    OrdenDetailsRepository::new(&store, &details_v(orden_id, 1))
        .await
        .unwrap();
    let err = OrdenDetailsRepository::new(&store, &details_v(orden_id, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn test_latest_status_by_created_at() {
    let store = MemoryStore::new();
    let orden_id = Uuid::new_v4();
    let mut newer = OrdenStatus::new(orden_id, OrdenStatusType::Accepted, Uuid::nil());
    newer.created_at += Duration::seconds(5);
    let older = OrdenStatus::new(orden_id, OrdenStatusType::Submitted, Uuid::nil());

    OrdenStatusRepository::new(&store, &newer).await.unwrap();
    OrdenStatusRepository::new(&store, &older).await.unwrap();

    let last = OrdenStatusRepository::get_last(&store, orden_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(last.status, OrdenStatusType::Accepted);
}

#[tokio::test]
async fn test_fail_after_lets_calls_through_first() {
    let store = MemoryStore::new();
    store.fail_after(FailPoint::CartInsert, 1);
    assert!(CartRepository::new(&store, Uuid::nil()).await.is_ok());
    assert!(CartRepository::new(&store, Uuid::nil()).await.is_err());
    store.clear_failures();
    assert!(CartRepository::new(&store, Uuid::nil()).await.is_ok());
}

#[tokio::test]
async fn test_row_packs_status_key_and_delivery_window() {
    let store = MemoryStore::new();
    let orden = OrdenRepository::new(
        &store,
        OrdenType::Normal,
        "1".into(),
        None,
        Uuid::nil(),
        Uuid::nil(),
    )
        .await
        .unwrap();
    let mut details = details_v(orden.id, 1);
    details.delivery_time = Some(Default::default());
    OrdenDetailsRepository::new(&store, &details).await.unwrap();
    OrdenStatusRepository::new(
        &store,
        &OrdenStatus::new(orden.id, OrdenStatusType::Picking, Uuid::nil()),
    )
    .await
    .unwrap();

    let row = OrdenRepository::fetch(&store, orden.id).await.unwrap().unwrap();
    assert_eq!(row.status.unwrap()["status"], "picking");
    assert_eq!(row.details.unwrap()["delivery_time"], "[9,18)");
    assert!(row.paystatus.is_none());
}
