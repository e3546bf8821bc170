//! Session lifecycle tests over a real store

use crate::common::TestDatabase;
use crate::common::fixtures;
use fieldtrack_rs::core::IngestOutcome;
use fieldtrack_rs::core::geo::haversine_km;
use fieldtrack_rs::TrackerError;
use fieldtrack_rs::storage::database::entities::{self, work_session};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use uuid::Uuid;

async fn open_session_count(db: &TestDatabase, seller_id: &str) -> usize {
    entities::WorkSession::find()
        .filter(work_session::Column::SellerId.eq(seller_id))
        .filter(work_session::Column::EndTime.is_null())
        .all(db.db().conn())
        .await
        .unwrap()
        .len()
}

#[tokio::test]
async fn storefront_open_creates_active_session() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    let session = lifecycle
        .set_storefront("seller-1", true)
        .await
        .unwrap()
        .unwrap();

    assert!(session.end_time.is_none());
    assert_eq!(session.total_distance_km, 0.0);

    let seller = db.db().find_seller("seller-1").await.unwrap().unwrap();
    assert!(seller.is_open);
}

#[tokio::test]
async fn storefront_close_ends_session() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    lifecycle.set_storefront("seller-1", true).await.unwrap();
    let closed = lifecycle
        .set_storefront("seller-1", false)
        .await
        .unwrap()
        .unwrap();

    assert!(closed.end_time.is_some());
    assert_eq!(open_session_count(&db, "seller-1").await, 0);
}

#[tokio::test]
async fn closing_without_open_session_is_benign() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    let result = lifecycle.set_storefront("seller-1", false).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn at_most_one_open_session_after_any_transition_sequence() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    for open in [true, true, false, true, false, false, true] {
        lifecycle.set_storefront("seller-1", open).await.unwrap();
        assert!(open_session_count(&db, "seller-1").await <= 1);
    }

    // The sequence ends open, so exactly one session is active
    assert_eq!(open_session_count(&db, "seller-1").await, 1);
}

#[tokio::test]
async fn full_shift_scenario_with_single_accepted_sample() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    // Seller opens the store: session created, end time null
    let session = lifecycle
        .set_storefront("seller-1", true)
        .await
        .unwrap()
        .unwrap();
    assert!(session.end_time.is_none());

    // First sample is accepted (no prior sample exists)
    let first = engine
        .ingest("seller-1", 10.0, 20.0, Some(session.id))
        .await
        .unwrap();
    assert!(first.is_recorded());

    // ~1.5 m away moments later: skipped by policy
    let second = engine
        .ingest("seller-1", 10.00001, 20.00001, Some(session.id))
        .await
        .unwrap();
    assert!(matches!(second, IngestOutcome::Skipped { .. }));

    // Closing the store stamps the end time and recomputes distance to ~0
    let closed = lifecycle
        .set_storefront("seller-1", false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(closed.id, session.id);
    assert!(closed.end_time.is_some());
    assert!(closed.total_distance_km.abs() < 1e-9);
}

#[tokio::test]
async fn recompute_sums_route_in_chronological_order() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    let session = lifecycle.open_shift("seller-1").await.unwrap();

    let a = fixtures::point(10.0, 20.0);
    let b = fixtures::point(10.1, 20.1);
    let c = fixtures::point(10.2, 20.0);

    // Inserted newest-first to prove recompute orders by recorded_at
    fixtures::insert_backdated_log(&db.storage, "seller-1", &c, 10, Some(session.id)).await;
    fixtures::insert_backdated_log(&db.storage, "seller-1", &a, 300, Some(session.id)).await;
    fixtures::insert_backdated_log(&db.storage, "seller-1", &b, 150, Some(session.id)).await;

    let distance = lifecycle.recompute_distance(session.id).await.unwrap();
    let expected = haversine_km(&a, &b) + haversine_km(&b, &c);
    assert!((distance - expected).abs() < 1e-9);

    let stored = db.db().find_session(session.id).await.unwrap().unwrap();
    assert!((stored.total_distance_km - expected).abs() < 1e-9);
}

#[tokio::test]
async fn recompute_skips_corrupt_rows() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    let session = lifecycle.open_shift("seller-1").await.unwrap();

    let a = fixtures::point(10.0, 20.0);
    let b = fixtures::point(10.1, 20.1);
    fixtures::insert_backdated_log(&db.storage, "seller-1", &a, 300, Some(session.id)).await;

    // A corrupt row between the two good ones must not abort the walk
    fixtures::insert_corrupt_log(&db.storage, "seller-1", 200, Some(session.id)).await;

    fixtures::insert_backdated_log(&db.storage, "seller-1", &b, 100, Some(session.id)).await;

    let distance = lifecycle.recompute_distance(session.id).await.unwrap();
    assert!((distance - haversine_km(&a, &b)).abs() < 1e-9);
}

#[tokio::test]
async fn recompute_of_unknown_session_is_not_found() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    let err = lifecycle.recompute_distance(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, TrackerError::NotFound(_)));
}

#[tokio::test]
async fn reopening_closes_stale_session_first() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    let first = lifecycle.open_shift("seller-1").await.unwrap();
    let second = lifecycle.open_shift("seller-1").await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(open_session_count(&db, "seller-1").await, 1);

    let stale = db.db().find_session(first.id).await.unwrap().unwrap();
    assert!(stale.end_time.is_some());
}

#[tokio::test]
async fn active_session_lookup() {
    let db = TestDatabase::new().await;
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    assert!(lifecycle.active_session("seller-1").await.unwrap().is_none());

    let opened = lifecycle.open_shift("seller-1").await.unwrap();
    let active = lifecycle.active_session("seller-1").await.unwrap().unwrap();
    assert_eq!(active.id, opened.id);
}
