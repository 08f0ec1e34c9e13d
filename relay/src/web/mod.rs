//! Web server module for handling inbound webhooks.
//!
//! This module provides the HTTP surface of the relay:
//! - `GET /` and `GET /health` for liveness checks
//! - `POST /github` for GitHub Sponsors events
//! - `POST /sentry` for Sentry issue events
//!
//! Accepted events are formatted and sent to Discord in the background.

pub mod error;
pub mod handlers;
pub mod signature;

use axum::{
    http::{header::HeaderName, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub use error::WebhookError;
pub use handlers::{
    github_webhook, health, index, sentry_webhook, AckResponse, AppState, HealthResponse,
    HelloResponse,
};
pub use signature::{verify_github_signature, verify_sentry_signature};

/// Build the router with all routes and layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/github", post(github_webhook))
        .route("/sentry", post(sentry_webhook))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-powered-by"),
            HeaderValue::from_static("webhook-relay"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
