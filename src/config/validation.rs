//! Configuration validation
//!
//! Validation logic for all configuration structures.

use crate::config::models::{
    CorsConfig, DatabaseConfig, ServerConfig, StorageConfig, TrackingConfig,
};

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("server host must not be empty".to_string());
        }
        if self.port == 0 {
            return Err("server port must not be 0".to_string());
        }
        if self.timeout == 0 {
            return Err("server timeout must be greater than 0".to_string());
        }
        if self.max_body_size == 0 {
            return Err("max body size must be greater than 0".to_string());
        }
        self.cors.validate()
    }
}

impl Validate for CorsConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.allowed_origins.is_empty() {
            return Err("CORS is enabled but no origins are allowed".to_string());
        }
        for origin in &self.allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(format!("invalid CORS origin: {}", origin));
            }
        }
        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        self.database.validate()
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("database url must not be empty".to_string());
        }
        let supported = ["sqlite:", "postgres:", "postgresql:"];
        if !supported.iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err(format!("unsupported database url scheme: {}", self.url));
        }
        if self.max_connections == 0 {
            return Err("database max_connections must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for TrackingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.min_interval_secs == 0 {
            return Err("tracking min_interval_secs must be greater than 0".to_string());
        }
        if !self.min_distance_m.is_finite() || self.min_distance_m <= 0.0 {
            return Err("tracking min_distance_m must be a positive number".to_string());
        }
        Ok(())
    }
}
