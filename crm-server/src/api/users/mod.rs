//! User roster routes

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Roster listing - public, the SPA's user picker loads it before any
/// identity exists.
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/usuarios", get(handler::list))
}
