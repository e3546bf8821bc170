//! Aggregate tracker configuration

use super::{ServerConfig, StorageConfig, TrackingConfig};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Top-level tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackerConfig {
    /// HTTP/WebSocket server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Sampling-policy configuration
    #[serde(default)]
    pub tracking: TrackingConfig,
}

#[allow(dead_code)]
impl TrackerConfig {
    /// Build configuration from environment variables
    ///
    /// Recognized variables: `FIELDTRACK_HOST`, `FIELDTRACK_PORT`,
    /// `DATABASE_URL`, `FIELDTRACK_MIN_INTERVAL_SECS`,
    /// `FIELDTRACK_MIN_DISTANCE_M`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("FIELDTRACK_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("FIELDTRACK_PORT") {
            config.server.port = port.parse().map_err(|_| {
                crate::utils::error::TrackerError::config(format!(
                    "FIELDTRACK_PORT is not a port number: {}",
                    port
                ))
            })?;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.storage.database.url = url;
        }
        if let Ok(interval) = std::env::var("FIELDTRACK_MIN_INTERVAL_SECS") {
            config.tracking.min_interval_secs = interval.parse().map_err(|_| {
                crate::utils::error::TrackerError::config(format!(
                    "FIELDTRACK_MIN_INTERVAL_SECS is not a number: {}",
                    interval
                ))
            })?;
        }
        if let Ok(distance) = std::env::var("FIELDTRACK_MIN_DISTANCE_M") {
            config.tracking.min_distance_m = distance.parse().map_err(|_| {
                crate::utils::error::TrackerError::config(format!(
                    "FIELDTRACK_MIN_DISTANCE_M is not a number: {}",
                    distance
                ))
            })?;
        }

        Ok(config)
    }

    /// Merge tracker configurations (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.storage = self.storage.merge(other.storage);
        self.tracking = self.tracking.merge(other.tracking);
        self
    }
}
