//! Spreadsheet export API module

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/planilha/exportar", post(handler::export))
}
