//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health checks
//! - [`users`] - user roster listing
//! - [`clients`] - client CRUD with embedded purchases
//! - [`contacts`] - post-sale follow-up listing and completion
//! - [`events`] - calendar events (stored + synthetic contact entries)
//! - [`sheets`] - optional spreadsheet export

pub mod clients;
pub mod contacts;
pub mod events;
pub mod health;
pub mod sheets;
pub mod users;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::middleware;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(clients::router())
        .merge(contacts::router())
        .merge(events::router())
        .merge(sheets::router())
}

/// Build the fully configured application with middleware and state.
///
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        // CORS - the SPA is served from elsewhere in development
        .layer(CorsLayer::permissive())
        // Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging - outermost, executed first
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate and propagate a unique id per request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state.clone())
}
