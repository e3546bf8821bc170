//! # Fieldtrack-RS
//!
//! A real-time location tracking gateway for field sellers. Accepts a
//! continuous stream of raw GPS samples, decides which samples are worth
//! persisting, associates them with work sessions (clock-in/clock-out),
//! and derives aggregate travel distance per shift.
//!
//! ## Features
//!
//! - **Realtime ingestion**: WebSocket channel with register/update/ping
//!   events and live-map broadcast fan-out
//! - **Sampling policy**: time/distance thresholds bound write volume
//!   without dropping movement bursts or long idle periods
//! - **Session lifecycle**: storefront open/close drives clock-in and
//!   clock-out, with travel distance recomputed on close
//! - **Spatial codec**: SRID 4326 binary point encoding with a textual
//!   `POINT(lon lat)` fallback
//! - **High Performance**: Built with Rust, Actix, and Tokio
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use fieldtrack_rs::{Config, Tracker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/tracker.yaml").await?;
//!     let tracker = Tracker::new(config).await?;
//!     tracker.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{Result, TrackerError};

// Export core tracking functionality
pub use core::geo::{GeoPoint, PointDecodeError, haversine_km, route_distance_km};
pub use core::{
    ConnectionRegistry, IngestOutcome, LocationIngestionEngine, LocationRecord, SellerChannel,
    SessionLifecycleManager, SessionView,
};

use tracing::info;

/// A minimal tracking gateway implementation
pub struct Tracker {
    config: Config,
    server: server::server::HttpServer,
}

impl Tracker {
    /// Create a new tracker instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Creating new tracker instance");

        // Create HTTP server
        let server = server::server::HttpServer::new(&config).await?;

        Ok(Self { config, server })
    }

    /// Run the tracking gateway
    pub async fn run(self) -> Result<()> {
        info!("Starting fieldtrack gateway");
        info!("Configuration: {:#?}", self.config);

        // Start HTTP server
        self.server.start().await?;

        Ok(())
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: "unknown",
            git_hash: "unknown",
            rust_version: "unknown",
        }
    }
}

/// Build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info() {
        let info = build_info();
        assert!(!info.version.is_empty());
        assert_eq!(info.version, VERSION);
    }

    #[test]
    fn test_constants() {
        // Test that constants are defined and have expected values
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, env!("CARGO_PKG_NAME"));
        assert_eq!(DESCRIPTION, env!("CARGO_PKG_DESCRIPTION"));
    }
}
