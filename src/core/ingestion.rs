//! Location sample ingestion
//!
//! Receives raw position samples, applies the sampling policy, and
//! persists accepted samples as location logs.
//!
//! The policy compares each sample against the seller's most recently
//! persisted log: the sample is stored when enough wall-clock time has
//! passed or the seller has moved far enough, and silently skipped
//! otherwise. Skipping is a success outcome, distinguishable from a
//! rejection of invalid input. No movement burst larger than the distance
//! threshold, and no idle gap longer than the interval threshold, is ever
//! dropped.

use crate::config::TrackingConfig;
use crate::core::geo::{haversine_m, wkb, GeoPoint};
use crate::storage::database::entities::location_log;
use crate::storage::StorageLayer;
use crate::utils::error::Result;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Decoded, serializable view of a persisted location log
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Log ID
    pub id: Uuid,
    /// Seller the sample belongs to
    pub seller_id: String,
    /// Session the sample was recorded under
    pub session_id: Option<Uuid>,
    /// Ingestion timestamp
    pub recorded_at: DateTime<Utc>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LocationRecord {
    /// Decode a database row into the API view
    ///
    /// Fails only when the stored geometry is corrupt; callers reading
    /// batches should skip such rows rather than abort.
    pub fn from_model(
        model: &location_log::Model,
    ) -> std::result::Result<Self, crate::core::geo::PointDecodeError> {
        let point = wkb::decode_any(&model.location)?;
        Ok(Self {
            id: model.id,
            seller_id: model.seller_id.clone(),
            session_id: model.session_id,
            recorded_at: model.recorded_at,
            latitude: point.latitude(),
            longitude: point.longitude(),
        })
    }
}

/// Outcome of an ingestion call
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// Sample accepted and persisted
    Recorded(LocationRecord),
    /// Sample discarded by the sampling policy
    Skipped {
        /// Seconds since the last persisted sample
        elapsed_secs: i64,
        /// Displacement from the last persisted sample, in meters
        moved_m: f64,
    },
}

impl IngestOutcome {
    /// Whether the sample was persisted
    pub fn is_recorded(&self) -> bool {
        matches!(self, IngestOutcome::Recorded(_))
    }
}

/// Sample ingestion engine
///
/// Thresholds come from [`TrackingConfig`]; elapsed time is evaluated
/// against wall-clock arrival time, not any client-claimed timestamp.
pub struct LocationIngestionEngine {
    storage: Arc<StorageLayer>,
    min_interval: Duration,
    min_distance_m: f64,
}

impl LocationIngestionEngine {
    /// Create an engine with thresholds from configuration
    pub fn new(storage: Arc<StorageLayer>, config: &TrackingConfig) -> Self {
        Self {
            storage,
            min_interval: Duration::seconds(config.min_interval_secs as i64),
            min_distance_m: config.min_distance_m,
        }
    }

    /// Ingest one raw position sample
    ///
    /// Validates coordinate ranges, applies the sampling policy against the
    /// seller's most recent persisted log, and persists the sample when it
    /// qualifies. Also refreshes the seller's last known point on accept.
    pub async fn ingest(
        &self,
        seller_id: &str,
        latitude: f64,
        longitude: f64,
        session_id: Option<Uuid>,
    ) -> Result<IngestOutcome> {
        let point = GeoPoint::new(latitude, longitude)?;
        let now = Utc::now();

        if let Some(last) = self.storage.db().latest_location_log(seller_id).await? {
            let elapsed = now - last.recorded_at;

            match wkb::decode_any(&last.location) {
                Ok(previous) => {
                    let moved_m = haversine_m(&previous, &point);
                    if elapsed <= self.min_interval && moved_m <= self.min_distance_m {
                        debug!(
                            seller_id,
                            elapsed_secs = elapsed.num_seconds(),
                            moved_m,
                            "sample skipped by sampling policy"
                        );
                        return Ok(IngestOutcome::Skipped {
                            elapsed_secs: elapsed.num_seconds(),
                            moved_m,
                        });
                    }
                }
                Err(e) => {
                    // A corrupt row must not abort ingestion; treat it as
                    // having no previous location.
                    warn!(seller_id, error = %e, "undecodable last location, accepting sample");
                }
            }
        }

        let encoded = wkb::encode(&point);
        self.storage.db().ensure_seller(seller_id).await?;
        let model = self
            .storage
            .db()
            .insert_location_log(seller_id, session_id, encoded.clone(), now)
            .await?;
        self.storage
            .db()
            .update_seller_location(seller_id, encoded)
            .await?;

        debug!(seller_id, log_id = %model.id, "location sample recorded");

        Ok(IngestOutcome::Recorded(LocationRecord {
            id: model.id,
            seller_id: model.seller_id,
            session_id: model.session_id,
            recorded_at: model.recorded_at,
            latitude: point.latitude(),
            longitude: point.longitude(),
        }))
    }
}
