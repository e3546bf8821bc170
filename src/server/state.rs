//! Application state shared across HTTP and realtime handlers
//!
//! This module provides the AppState struct and its implementations.

use crate::config::Config;
use crate::core::{ConnectionRegistry, LocationIngestionEngine, SessionLifecycleManager};
use crate::storage::StorageLayer;
use std::sync::Arc;

/// Server state shared across handlers
///
/// All fields are wrapped in Arc for efficient sharing across threads.
#[derive(Clone)]
pub struct AppState {
    /// Tracker configuration (shared read-only)
    pub config: Arc<Config>,
    /// Storage layer
    pub storage: Arc<StorageLayer>,
    /// Sample ingestion engine
    pub ingestion: Arc<LocationIngestionEngine>,
    /// Work-session lifecycle manager
    pub sessions: Arc<SessionLifecycleManager>,
    /// Live realtime-channel registry
    pub registry: Arc<ConnectionRegistry>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, storage: StorageLayer) -> Self {
        let storage = Arc::new(storage);
        let ingestion = Arc::new(LocationIngestionEngine::new(
            Arc::clone(&storage),
            config.tracking(),
        ));
        let sessions = Arc::new(SessionLifecycleManager::new(Arc::clone(&storage)));
        let registry = Arc::new(ConnectionRegistry::new());

        Self {
            config: Arc::new(config),
            storage,
            ingestion,
            sessions,
            registry,
        }
    }

    /// Get tracker configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
