use crate::config::DatabaseConfig;
use crate::utils::error::{Result, TrackerError};
use chrono::{DateTime, Utc};
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::entities::{self, location_log, seller, work_session};
use super::migration::Migrator;

/// SeaORM-based database implementation
///
/// Typed query surface for the three tracker tables. All mutations of
/// location logs are inserts; log rows are never updated or deleted here.
#[derive(Debug)]
pub struct SeaOrmDatabase {
    db: DatabaseConnection,
}

impl SeaOrmDatabase {
    /// Create a new database connection
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let db = Database::connect(opt)
            .await
            .map_err(TrackerError::Database)?;

        info!("Database connection established");
        Ok(Self { db })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations...");
        Migrator::up(&self.db, None).await.map_err(|e| {
            warn!("Migration failed: {}", e);
            TrackerError::Database(e)
        })?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Check database connectivity
    pub async fn health_check(&self) -> Result<()> {
        self.db.ping().await.map_err(TrackerError::Database)
    }

    /// Get database connection for advanced operations
    pub fn conn(&self) -> &DatabaseConnection {
        &self.db
    }

    // --- sellers ---------------------------------------------------------

    /// Find seller by ID
    pub async fn find_seller(&self, seller_id: &str) -> Result<Option<seller::Model>> {
        entities::Seller::find_by_id(seller_id)
            .one(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// Fetch a seller, creating the row on first contact
    pub async fn ensure_seller(&self, seller_id: &str) -> Result<seller::Model> {
        if let Some(existing) = self.find_seller(seller_id).await? {
            return Ok(existing);
        }

        debug!("Creating seller row: {}", seller_id);
        let active_model = seller::ActiveModel {
            id: Set(seller_id.to_string()),
            is_open: Set(false),
            last_location: Set(None),
            updated_at: Set(Utc::now()),
        };

        active_model
            .insert(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// Flip the seller's storefront flag
    pub async fn set_storefront(&self, seller_id: &str, open: bool) -> Result<seller::Model> {
        let existing = self.ensure_seller(seller_id).await?;

        let mut active_model: seller::ActiveModel = existing.into();
        active_model.is_open = Set(open);
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// Update the seller's last known point
    pub async fn update_seller_location(&self, seller_id: &str, location: Vec<u8>) -> Result<()> {
        let existing = self.ensure_seller(seller_id).await?;

        let mut active_model: seller::ActiveModel = existing.into();
        active_model.last_location = Set(Some(location));
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(&self.db)
            .await
            .map_err(TrackerError::Database)?;

        Ok(())
    }

    // --- sessions --------------------------------------------------------

    /// Create a new open session for a seller
    pub async fn open_session(
        &self,
        seller_id: &str,
        start_time: DateTime<Utc>,
    ) -> Result<work_session::Model> {
        debug!("Opening session for seller: {}", seller_id);

        let active_model = work_session::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id.to_string()),
            start_time: Set(start_time),
            end_time: Set(None),
            total_distance_km: Set(0.0),
        };

        active_model
            .insert(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// Find the seller's session with a null end time, newest first
    pub async fn find_open_session(&self, seller_id: &str) -> Result<Option<work_session::Model>> {
        entities::WorkSession::find()
            .filter(work_session::Column::SellerId.eq(seller_id))
            .filter(work_session::Column::EndTime.is_null())
            .order_by_desc(work_session::Column::StartTime)
            .one(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// Find session by ID
    pub async fn find_session(&self, session_id: Uuid) -> Result<Option<work_session::Model>> {
        entities::WorkSession::find_by_id(session_id)
            .one(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// Set a session's end time
    pub async fn close_session(
        &self,
        session_id: Uuid,
        end_time: DateTime<Utc>,
    ) -> Result<work_session::Model> {
        let session = self
            .find_session(session_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("session {}", session_id)))?;

        let mut active_model: work_session::ActiveModel = session.into();
        active_model.end_time = Set(Some(end_time));

        active_model
            .update(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// Write a recomputed travel distance into a session
    pub async fn set_session_distance(&self, session_id: Uuid, distance_km: f64) -> Result<()> {
        let session = self
            .find_session(session_id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("session {}", session_id)))?;

        let mut active_model: work_session::ActiveModel = session.into();
        active_model.total_distance_km = Set(distance_km);

        active_model
            .update(&self.db)
            .await
            .map_err(TrackerError::Database)?;

        Ok(())
    }

    // --- location logs ---------------------------------------------------

    /// Insert an accepted position sample
    pub async fn insert_location_log(
        &self,
        seller_id: &str,
        session_id: Option<Uuid>,
        location: Vec<u8>,
        recorded_at: DateTime<Utc>,
    ) -> Result<location_log::Model> {
        let active_model = location_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id.to_string()),
            session_id: Set(session_id),
            recorded_at: Set(recorded_at),
            location: Set(location),
        };

        active_model
            .insert(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// The seller's most recently persisted sample, if any
    pub async fn latest_location_log(
        &self,
        seller_id: &str,
    ) -> Result<Option<location_log::Model>> {
        entities::LocationLog::find()
            .filter(location_log::Column::SellerId.eq(seller_id))
            .order_by_desc(location_log::Column::RecordedAt)
            .one(&self.db)
            .await
            .map_err(TrackerError::Database)
    }

    /// All samples for a session in chronological order
    pub async fn location_logs_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<location_log::Model>> {
        entities::LocationLog::find()
            .filter(location_log::Column::SessionId.eq(session_id))
            .order_by_asc(location_log::Column::RecordedAt)
            .all(&self.db)
            .await
            .map_err(TrackerError::Database)
    }
}
