//! Health check routes
//!
//! | path | method | auth |
//! |------|--------|------|
//! | /api/health | GET | none |
//! | /api/health/detalhes | GET | none |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Health routes - public, no identity required
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/health", get(handler::health))
        .route("/api/health/detalhes", get(handler::detailed_health))
}
