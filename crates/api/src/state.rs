use std::sync::Arc;

use stride_core::awards::BadgeAwarder;
use stride_core::badges::BadgeCatalog;
use stride_core::migration::MigrationRegistry;
use stride_core::store::Documents;
use stride_db::PgStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stride_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Schema upgrades applied to every document read.
    pub registry: Arc<MigrationRegistry>,
    /// Badges users can earn.
    pub catalog: Arc<BadgeCatalog>,
}

impl AppState {
    pub fn store(&self) -> PgStore {
        PgStore::new(self.pool.clone())
    }

    /// Migrating document access over the shared pool.
    pub fn documents(&self) -> Documents<PgStore> {
        Documents::new(self.store(), Arc::clone(&self.registry))
    }

    pub fn awarder(&self) -> BadgeAwarder<PgStore> {
        BadgeAwarder::new(Arc::clone(&self.catalog), self.store())
    }
}
