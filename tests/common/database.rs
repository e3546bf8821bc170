//! In-memory database helpers

use fieldtrack_rs::config::{DatabaseConfig, StorageConfig};
use fieldtrack_rs::storage::StorageLayer;
use fieldtrack_rs::storage::database::Database;
use std::sync::Arc;

/// A migrated in-memory SQLite database for integration tests
pub struct TestDatabase {
    /// Storage layer over the in-memory database
    pub storage: Arc<StorageLayer>,
}

impl TestDatabase {
    /// Connect an in-memory SQLite database and run all migrations
    pub async fn new() -> Self {
        let config = StorageConfig {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
                ..Default::default()
            },
        };

        let storage = StorageLayer::new(&config)
            .await
            .expect("in-memory database should connect");
        storage
            .migrate()
            .await
            .expect("migrations should apply cleanly");

        Self {
            storage: Arc::new(storage),
        }
    }

    /// Typed database handle
    pub fn db(&self) -> &Database {
        self.storage.db()
    }
}
