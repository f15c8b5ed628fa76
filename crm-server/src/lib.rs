//! Ótica CRM - backend server
//!
//! REST backend for an eyewear retailer's CRM: clients with purchase and
//! prescription history, post-sale follow-up contacts, and a calendar of
//! events. Every user of the fixed roster gets an isolated store file;
//! requests resolve an identity first and never touch another user's data.
//!
//! # Module structure
//!
//! ```text
//! crm-server/src/
//! ├── core/        # config, state, server lifecycle
//! ├── identity/    # candidate scanning + roster
//! ├── ownership/   # owner aliases, resolution, ACL checks
//! ├── decorate/    # response decoration (aliases + derived fields)
//! ├── api/         # HTTP routes and handlers
//! ├── db/          # per-user stores, repositories
//! ├── services/    # spreadsheet export integration
//! ├── middleware/  # request logging
//! └── utils/       # validation, dates, logger
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod decorate;
pub mod identity;
pub mod middleware;
pub mod ownership;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load .env, then initialize logging from the environment.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
