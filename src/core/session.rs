//! Work-session lifecycle
//!
//! Opens and closes work sessions as the seller's storefront opens and
//! closes, and recomputes aggregate travel distance when a shift ends.
//!
//! Per seller the lifecycle is a two-state machine, `Closed` and `Open`.
//! A newly onboarded seller is implicitly `Closed`; sessions cycle
//! indefinitely. Invariant: at most one session per seller has a null end
//! time at any moment.

use crate::core::geo::{route_distance_km, wkb};
use crate::storage::database::entities::work_session;
use crate::storage::StorageLayer;
use crate::utils::error::{Result, TrackerError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Serializable view of a work session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Session ID
    pub id: Uuid,
    /// Seller the session belongs to
    pub seller_id: String,
    /// Clock-in timestamp
    pub start_time: DateTime<Utc>,
    /// Clock-out timestamp; null while active
    pub end_time: Option<DateTime<Utc>>,
    /// Aggregate travel distance in kilometers
    pub total_distance_km: f64,
}

impl From<work_session::Model> for SessionView {
    fn from(model: work_session::Model) -> Self {
        Self {
            id: model.id,
            seller_id: model.seller_id,
            start_time: model.start_time,
            end_time: model.end_time,
            total_distance_km: model.total_distance_km,
        }
    }
}

/// Session lifecycle manager
pub struct SessionLifecycleManager {
    storage: Arc<StorageLayer>,
}

impl SessionLifecycleManager {
    /// Create a manager over the given storage layer
    pub fn new(storage: Arc<StorageLayer>) -> Self {
        Self { storage }
    }

    /// Drive the lifecycle from a storefront transition
    ///
    /// Opening the storefront clocks the seller in; closing clocks out and
    /// recomputes the shift's travel distance. Returns the session the
    /// transition touched, if any.
    pub async fn set_storefront(
        &self,
        seller_id: &str,
        open: bool,
    ) -> Result<Option<SessionView>> {
        self.storage.db().set_storefront(seller_id, open).await?;

        if open {
            self.open_shift(seller_id).await.map(Some)
        } else {
            self.close_shift(seller_id).await
        }
    }

    /// Clock a seller in, creating a fresh open session
    ///
    /// A stale open session (from a missed clock-out) is closed first so
    /// the one-open-session invariant holds across repeated opens.
    pub async fn open_shift(&self, seller_id: &str) -> Result<SessionView> {
        if let Some(stale) = self.storage.db().find_open_session(seller_id).await? {
            warn!(
                seller_id,
                session_id = %stale.id,
                "seller reopened with a session still active, closing it"
            );
            self.finish_session(stale.id).await?;
        }

        let session = self.storage.db().open_session(seller_id, Utc::now()).await?;
        info!(seller_id, session_id = %session.id, "work session opened");
        Ok(session.into())
    }

    /// Clock a seller out
    ///
    /// Closing without an open session is tolerated as a no-op; the
    /// transition is logged but never an error.
    pub async fn close_shift(&self, seller_id: &str) -> Result<Option<SessionView>> {
        let Some(session) = self.storage.db().find_open_session(seller_id).await? else {
            warn!(seller_id, "storefront closed with no active session");
            return Ok(None);
        };

        let closed = self.finish_session(session.id).await?;
        info!(
            seller_id,
            session_id = %closed.id,
            total_distance_km = closed.total_distance_km,
            "work session closed"
        );
        Ok(Some(closed))
    }

    /// Recompute a session's aggregate travel distance
    ///
    /// Walks the session's samples in chronological order and sums the
    /// great-circle distance between consecutive points. Rows with corrupt
    /// geometry are skipped; fewer than two decodable points yield 0.
    pub async fn recompute_distance(&self, session_id: Uuid) -> Result<f64> {
        if self.storage.db().find_session(session_id).await?.is_none() {
            return Err(TrackerError::not_found(format!("session {}", session_id)));
        }

        let logs = self
            .storage
            .db()
            .location_logs_for_session(session_id)
            .await?;

        let mut points = Vec::with_capacity(logs.len());
        for log in &logs {
            match wkb::decode_any(&log.location) {
                Ok(point) => points.push(point),
                Err(e) => {
                    warn!(log_id = %log.id, error = %e, "skipping undecodable location log");
                }
            }
        }

        let distance_km = route_distance_km(&points);
        self.storage
            .db()
            .set_session_distance(session_id, distance_km)
            .await?;

        debug!(
            session_id = %session_id,
            samples = points.len(),
            distance_km,
            "session distance recomputed"
        );
        Ok(distance_km)
    }

    /// Fetch the seller's active session, if any
    pub async fn active_session(&self, seller_id: &str) -> Result<Option<SessionView>> {
        Ok(self
            .storage
            .db()
            .find_open_session(seller_id)
            .await?
            .map(Into::into))
    }

    async fn finish_session(&self, session_id: Uuid) -> Result<SessionView> {
        self.storage.db().close_session(session_id, Utc::now()).await?;
        self.recompute_distance(session_id).await?;

        let session = self
            .storage
            .db()
            .find_session(session_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("session {}", session_id)))?;
        Ok(session.into())
    }
}
