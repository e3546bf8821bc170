//! Configuration management for the tracker
//!
//! This module handles loading, validation, and management of all tracker
//! configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, TrackerError};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the tracker
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Tracker configuration
    pub tracker: TrackerConfig,
}

#[allow(dead_code)]
impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TrackerError::Config(format!("Failed to read config file: {}", e)))?;

        let tracker: TrackerConfig = serde_yaml::from_str(&content)
            .map_err(|e| TrackerError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { tracker };

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let tracker = TrackerConfig::from_env()?;
        let config = Self { tracker };

        config.validate()?;
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.tracker.server
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.tracker.storage
    }

    /// Get tracking configuration
    pub fn tracking(&self) -> &TrackingConfig {
        &self.tracker.tracking
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.tracker
            .server
            .validate()
            .map_err(|e| TrackerError::Config(format!("Server config error: {}", e)))?;

        self.tracker
            .storage
            .validate()
            .map_err(|e| TrackerError::Config(format!("Storage config error: {}", e)))?;

        self.tracker
            .tracking
            .validate()
            .map_err(|e| TrackerError::Config(format!("Tracking config error: {}", e)))?;

        self.tracker.server.cors.warn_if_insecure();

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.tracker = self.tracker.merge(other.tracker);
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.tracker)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.tracker)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
