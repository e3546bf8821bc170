//! Sampling-policy tests over a real store

use crate::common::TestDatabase;
use crate::common::fixtures;
use fieldtrack_rs::core::IngestOutcome;
use fieldtrack_rs::core::geo::wkb;
use fieldtrack_rs::TrackerError;
use std::sync::Arc;

#[tokio::test]
async fn first_sample_is_always_accepted() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    let outcome = engine.ingest("seller-1", 10.0, 20.0, None).await.unwrap();
    assert!(outcome.is_recorded());

    let stored = db.db().latest_location_log("seller-1").await.unwrap();
    assert!(stored.is_some());
}

#[tokio::test]
async fn nearby_recent_sample_is_skipped() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    // Last sample: just now, at the origin point
    fixtures::insert_backdated_log(&db.storage, "seller-1", &fixtures::point(10.0, 20.0), 1, None)
        .await;

    // ~1.5 m away, 1 s later: inside both thresholds
    let outcome = engine
        .ingest("seller-1", 10.00001, 20.00001, None)
        .await
        .unwrap();

    match outcome {
        IngestOutcome::Skipped {
            elapsed_secs,
            moved_m,
        } => {
            assert!(elapsed_secs <= 120);
            assert!(moved_m < 20.0);
        }
        other => panic!("expected skip, got {:?}", other),
    }

    // Nothing new was persisted
    let last = db.db().latest_location_log("seller-1").await.unwrap().unwrap();
    let decoded = wkb::decode(&last.location).unwrap();
    assert_eq!(decoded.latitude(), 10.0);
}

#[tokio::test]
async fn distant_sample_is_accepted_immediately() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    fixtures::insert_backdated_log(&db.storage, "seller-1", &fixtures::point(10.0, 20.0), 1, None)
        .await;

    // ~110 m north: past the 20 m threshold even though only 1 s elapsed
    let outcome = engine.ingest("seller-1", 10.001, 20.0, None).await.unwrap();
    assert!(outcome.is_recorded());
}

#[tokio::test]
async fn stale_sample_is_accepted_at_same_spot() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    // Last sample 121 s ago: past the 120 s threshold
    fixtures::insert_backdated_log(
        &db.storage,
        "seller-1",
        &fixtures::point(10.0, 20.0),
        121,
        None,
    )
    .await;

    let outcome = engine.ingest("seller-1", 10.0, 20.0, None).await.unwrap();
    assert!(outcome.is_recorded());
}

#[tokio::test]
async fn recent_same_spot_sample_is_skipped() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    // Same coordinates, only 60 s elapsed: neither branch fires
    fixtures::insert_backdated_log(
        &db.storage,
        "seller-1",
        &fixtures::point(10.0, 20.0),
        60,
        None,
    )
    .await;

    let outcome = engine.ingest("seller-1", 10.0, 20.0, None).await.unwrap();
    assert!(!outcome.is_recorded());
}

#[tokio::test]
async fn invalid_coordinates_never_reach_storage() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    let err = engine.ingest("seller-1", 200.0, 20.0, None).await.unwrap_err();
    assert!(matches!(err, TrackerError::InvalidCoordinate(_)));

    let err = engine.ingest("seller-1", 10.0, -500.0, None).await.unwrap_err();
    assert!(matches!(err, TrackerError::InvalidCoordinate(_)));

    assert!(db.db().latest_location_log("seller-1").await.unwrap().is_none());
}

#[tokio::test]
async fn corrupt_previous_row_does_not_block_ingestion() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    fixtures::insert_corrupt_log(&db.storage, "seller-1", 1, None).await;

    // The undecodable row is treated as "no previous location"
    let outcome = engine.ingest("seller-1", 10.0, 20.0, None).await.unwrap();
    assert!(outcome.is_recorded());
}

#[tokio::test]
async fn textual_previous_sample_drives_the_policy() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    // The last sample survives in the textual fallback form
    fixtures::insert_wkt_log(&db.storage, "seller-1", &fixtures::point(10.0, 20.0), 1, None).await;

    let outcome = engine
        .ingest("seller-1", 10.00001, 20.00001, None)
        .await
        .unwrap();
    assert!(!outcome.is_recorded());
}

#[tokio::test]
async fn accepted_sample_refreshes_seller_last_location() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));

    engine.ingest("seller-1", -33.9, 18.4, None).await.unwrap();

    let seller = db.db().find_seller("seller-1").await.unwrap().unwrap();
    let last = wkb::decode(&seller.last_location.unwrap()).unwrap();
    assert_eq!(last.latitude(), -33.9);
    assert_eq!(last.longitude(), 18.4);
}

#[tokio::test]
async fn sample_carries_caller_supplied_session_id() {
    let db = TestDatabase::new().await;
    let engine = fixtures::ingestion_engine(Arc::clone(&db.storage));
    let lifecycle = fixtures::lifecycle_manager(Arc::clone(&db.storage));

    let session = lifecycle.open_shift("seller-1").await.unwrap();

    let outcome = engine
        .ingest("seller-1", 10.0, 20.0, Some(session.id))
        .await
        .unwrap();

    match outcome {
        IngestOutcome::Recorded(record) => assert_eq!(record.session_id, Some(session.id)),
        other => panic!("expected recorded sample, got {:?}", other),
    }
}
