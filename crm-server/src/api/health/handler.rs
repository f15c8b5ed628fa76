//! Health API Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::ServerState;

/// Simple health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | error
    status: &'static str,
    /// Active storage backend (file | memory)
    storage: &'static str,
}

/// GET /api/health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        storage: state.stores.backend().as_str(),
    })
}

/// Detailed health check response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
    environment: String,
    /// Uptime in seconds
    uptime: i64,
    /// Per-user stores opened since startup
    open_stores: usize,
    /// Spreadsheet integration ready
    sheets_configured: bool,
}

/// GET /api/health/detalhes
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    Json(DetailedHealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.stores.backend().as_str(),
        environment: state.config.environment.clone(),
        uptime: state.uptime_secs(),
        open_stores: state.stores.open_stores().await,
        sheets_configured: state.config.sheets.is_configured(),
    })
}
