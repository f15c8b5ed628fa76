//! Server state - shared references held by every handler

use std::sync::Arc;

use shared::util::now_millis;

use crate::core::Config;
use crate::db::StoreFactory;
use crate::services::SheetsService;

/// Shared server state. `Arc` fields make cloning cheap; axum clones the
/// state once per request.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Immutable configuration
    pub config: Config,
    /// Per-user store factory and handle cache
    pub stores: Arc<StoreFactory>,
    /// Optional spreadsheet export integration
    pub sheets: Arc<SheetsService>,
    /// Startup timestamp (millis), for the detailed health report
    pub started_at: i64,
}

impl ServerState {
    pub fn initialize(config: &Config) -> Self {
        if config.storage_backend == crate::db::factory::StorageBackend::File {
            // The work dir must exist before the first store file is created.
            if let Err(e) = std::fs::create_dir_all(&config.work_dir) {
                tracing::warn!(dir = %config.work_dir, error = %e, "Failed to create work dir");
            }
        }

        let stores = StoreFactory::new(
            config.storage_backend,
            config.work_dir.clone(),
            &config.db_file,
        );

        Self {
            config: config.clone(),
            stores: Arc::new(stores),
            sheets: Arc::new(SheetsService::new(config.sheets.clone())),
            started_at: now_millis(),
        }
    }

    /// Uptime in whole seconds.
    pub fn uptime_secs(&self) -> i64 {
        (now_millis() - self.started_at) / 1000
    }
}
