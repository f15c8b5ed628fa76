//! Server configuration
//!
//! Every setting can be overridden through environment variables:
//!
//! | variable | default | meaning |
//! |----------|---------|---------|
//! | WORK_DIR | ./data | directory holding the per-user store files |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DB_FILE | crm.db | base store filename (`crm.db` → `crm.<user>.db`) |
//! | STORAGE_BACKEND | file | `file` or `memory` (test double) |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | LOG_LEVEL | info | tracing level |
//! | LOG_DIR | (unset) | daily-rolling log file directory |
//! | SHEETS_API_URL | (unset) | spreadsheet integration endpoint |
//! | SHEETS_SPREADSHEET_ID | (unset) | target spreadsheet |
//! | SHEETS_API_TOKEN | (unset) | bearer token |
//! | SHEETS_TIMEOUT_MS | 10000 | outbound call timeout |

use crate::db::factory::StorageBackend;

/// Optional spreadsheet integration settings. The integration is off
/// until all three values are present; requests against it then report
/// which ones are missing.
#[derive(Debug, Clone, Default)]
pub struct SheetsConfig {
    pub api_url: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub api_token: Option<String>,
    pub timeout_ms: u64,
}

impl SheetsConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("SHEETS_API_URL").ok().filter(|v| !v.is_empty()),
            spreadsheet_id: std::env::var("SHEETS_SPREADSHEET_ID")
                .ok()
                .filter(|v| !v.is_empty()),
            api_token: std::env::var("SHEETS_API_TOKEN").ok().filter(|v| !v.is_empty()),
            timeout_ms: std::env::var("SHEETS_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
        }
    }

    /// Environment variables still unset, in declaration order.
    pub fn missing(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.api_url.is_none() {
            missing.push("SHEETS_API_URL".to_string());
        }
        if self.spreadsheet_id.is_none() {
            missing.push("SHEETS_SPREADSHEET_ID".to_string());
        }
        if self.api_token.is_none() {
            missing.push("SHEETS_API_TOKEN".to_string());
        }
        missing
    }

    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding store files and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Base store filename; the factory derives per-user files from it
    pub db_file: String,
    /// Storage backend selection
    pub storage_backend: StorageBackend,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Optional spreadsheet integration
    pub sheets: SheetsConfig,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            db_file: std::env::var("DB_FILE").unwrap_or_else(|_| "crm.db".into()),
            storage_backend: StorageBackend::parse(
                &std::env::var("STORAGE_BACKEND").unwrap_or_else(|_| "file".into()),
            ),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
            sheets: SheetsConfig::from_env(),
        }
    }

    /// Override the parts tests care about.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
