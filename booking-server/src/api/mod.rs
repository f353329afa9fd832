//! API routes
//!
//! # Structure
//!
//! - [`health`] - health checks
//! - [`tables`] - table registry and availability
//! - [`reservations`] - reservation lifecycle
//!
//! `build_router` registers routes only (used directly by tests);
//! `build_app` adds the middleware stack.

pub mod health;
pub mod reservations;
pub mod tables;


use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Request ID generator (snowflake-based, no uuid dependency)
#[derive(Clone)]
struct BookingRequestId;

impl MakeRequestId for BookingRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = shared::util::snowflake_id().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).ok()?))
    }
}

/// JSON 404 for unknown routes
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": "Not Found" })),
    )
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(reservations::router())
        .fallback(not_found)
}

/// Build a fully configured application with all middleware
pub fn build_app() -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            BookingRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
