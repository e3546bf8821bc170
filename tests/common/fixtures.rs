//! Test fixtures and data factories

use chrono::{Duration, Utc};
use fieldtrack_rs::config::TrackingConfig;
use fieldtrack_rs::core::geo::wkb;
use fieldtrack_rs::core::{LocationIngestionEngine, SessionLifecycleManager};
use fieldtrack_rs::GeoPoint;
use fieldtrack_rs::storage::StorageLayer;
use fieldtrack_rs::storage::database::entities::location_log;
use std::sync::Arc;
use uuid::Uuid;

/// Default sampling thresholds (120 s / 20 m)
pub fn tracking_config() -> TrackingConfig {
    TrackingConfig::default()
}

/// Ingestion engine over a test storage layer
pub fn ingestion_engine(storage: Arc<StorageLayer>) -> LocationIngestionEngine {
    LocationIngestionEngine::new(storage, &tracking_config())
}

/// Session lifecycle manager over a test storage layer
pub fn lifecycle_manager(storage: Arc<StorageLayer>) -> SessionLifecycleManager {
    SessionLifecycleManager::new(storage)
}

/// A point factory that panics on invalid fixtures
pub fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng).expect("fixture coordinates must be valid")
}

/// Insert a location log whose `recorded_at` lies in the past
///
/// The sampling policy evaluates elapsed time against wall-clock arrival
/// time, so tests drive the time branch by backdating the previous sample
/// rather than sleeping.
pub async fn insert_backdated_log(
    storage: &StorageLayer,
    seller_id: &str,
    p: &GeoPoint,
    seconds_ago: i64,
    session_id: Option<Uuid>,
) -> location_log::Model {
    storage
        .db()
        .ensure_seller(seller_id)
        .await
        .expect("seller row");
    storage
        .db()
        .insert_location_log(
            seller_id,
            session_id,
            wkb::encode(p),
            Utc::now() - Duration::seconds(seconds_ago),
        )
        .await
        .expect("backdated log insert")
}

/// Insert a location log stored in the textual fallback form
pub async fn insert_wkt_log(
    storage: &StorageLayer,
    seller_id: &str,
    p: &GeoPoint,
    seconds_ago: i64,
    session_id: Option<Uuid>,
) -> location_log::Model {
    storage
        .db()
        .ensure_seller(seller_id)
        .await
        .expect("seller row");
    storage
        .db()
        .insert_location_log(
            seller_id,
            session_id,
            format!("POINT({} {})", p.longitude(), p.latitude()).into_bytes(),
            Utc::now() - Duration::seconds(seconds_ago),
        )
        .await
        .expect("wkt log insert")
}

/// Insert a location log with a corrupt geometry payload
pub async fn insert_corrupt_log(
    storage: &StorageLayer,
    seller_id: &str,
    seconds_ago: i64,
    session_id: Option<Uuid>,
) -> location_log::Model {
    storage
        .db()
        .ensure_seller(seller_id)
        .await
        .expect("seller row");
    storage
        .db()
        .insert_location_log(
            seller_id,
            session_id,
            vec![0xde, 0xad, 0xbe, 0xef],
            Utc::now() - Duration::seconds(seconds_ago),
        )
        .await
        .expect("corrupt log insert")
}
