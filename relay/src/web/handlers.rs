//! Webhook endpoint handlers.
//!
//! Each handler only does the work needed to answer the caller:
//! 1. Check the source is enabled
//! 2. Verify the signature against the raw body
//! 3. Parse and classify the payload
//! 4. Hand formatting and dispatch to a background task
//!
//! The response never waits on Discord.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::dispatch::Dispatcher;
use crate::event::{
    classify_sentry, classify_sponsors, parse_body, SentryEvent, SponsorsEvent, SponsorshipAction,
    SponsorshipPayload,
};
use crate::format::{format_issue, format_raw_issue, format_sponsorship, OutboundMessage};
use crate::profile::ProfileClient;
use crate::util::build_client;
use crate::web::error::WebhookError;
use crate::web::signature::{verify_github_signature, verify_sentry_signature};
use crate::Config;

pub const GITHUB_SIGNATURE_HEADER: &str = "x-hub-signature";
pub const GITHUB_EVENT_HEADER: &str = "x-github-event";
pub const SENTRY_SIGNATURE_HEADER: &str = "sentry-hook-signature";
pub const SENTRY_RESOURCE_HEADER: &str = "sentry-hook-resource";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
    pub profiles: ProfileClient,
}

impl AppState {
    /// Build state with one HTTP client shared by dispatch and lookups.
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let client = build_client(config.request_timeout)?;
        let dispatcher = Dispatcher::new(client.clone(), config.discord_webhook_url.clone());
        let profiles = ProfileClient::new(
            client,
            config.github_token.clone(),
            config.sponsor_profile_lookup,
        );
        Ok(Self::from_parts(config, dispatcher, profiles))
    }

    pub fn from_parts(config: Config, dispatcher: Dispatcher, profiles: ProfileClient) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
            profiles,
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// =============================================================================
// Liveness
// =============================================================================

#[derive(Serialize)]
pub struct HelloResponse {
    pub hello: &'static str,
}

pub async fn index() -> Json<HelloResponse> {
    Json(HelloResponse { hello: "world" })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Body returned for every accepted webhook, including ignored events.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

fn ack() -> Json<AckResponse> {
    Json(AckResponse { ok: true })
}

// =============================================================================
// GitHub Sponsors Webhook
// =============================================================================

/// GitHub Sponsors webhook endpoint.
///
/// Unknown actions and unrecognized bodies are acknowledged with 200 so
/// GitHub does not keep redelivering them.
pub async fn github_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AckResponse>, WebhookError> {
    info!(
        event = header(&headers, GITHUB_EVENT_HEADER).unwrap_or("unknown"),
        body_length = body.len(),
        "github_webhook_received"
    );

    if !state.config.github_enabled {
        warn!("github_webhook_disabled");
        return Err(WebhookError::SourceDisabled("github"));
    }

    let Some(signature) = headers.get(GITHUB_SIGNATURE_HEADER) else {
        warn!("github_signature_missing");
        return Err(WebhookError::MissingSignature("X-Hub-Signature"));
    };
    let signature = signature.to_str().unwrap_or_default();

    let Some(secret) = state.config.secret.as_deref() else {
        warn!("github_secret_not_configured");
        return Err(WebhookError::InvalidSignature);
    };

    if !verify_github_signature(secret, &body, signature) {
        warn!("github_signature_invalid");
        return Err(WebhookError::InvalidSignature);
    }

    let value = parse_body(&body).map_err(|e| {
        warn!(error = %e, "github_body_invalid_json");
        WebhookError::MalformedBody(e)
    })?;

    match classify_sponsors(&value) {
        SponsorsEvent::SetupPing(ping) => {
            info!(hook_id = ?ping.hook_id, "github_setup_ping_acknowledged");
        }
        SponsorsEvent::Sponsorship(action, payload) => {
            info!(
                action = action.as_str(),
                sponsor = %payload.sponsorship.sponsor.login,
                sponsorable = %payload.sponsorship.sponsorable.login,
                "github_sponsorship_accepted"
            );
            tokio::spawn(relay_sponsorship(state.clone(), action, payload));
        }
        SponsorsEvent::Ignored { action } => {
            info!(action = %action, "github_sponsorship_ignored");
        }
        SponsorsEvent::Unrecognized => {
            info!("github_payload_unrecognized");
        }
    }

    Ok(ack())
}

async fn relay_sponsorship(
    state: AppState,
    action: SponsorshipAction,
    payload: Box<SponsorshipPayload>,
) {
    let names = state.profiles.resolve(&payload).await;
    let message = format_sponsorship(action, &payload, &names);
    state.dispatcher.dispatch(message).await;
}

// =============================================================================
// Sentry Webhook
// =============================================================================

/// Sentry webhook endpoint.
///
/// Requests without a `Sentry-Hook-Signature` header get 204 and are
/// otherwise ignored.
pub async fn sentry_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    info!(
        resource = header(&headers, SENTRY_RESOURCE_HEADER).unwrap_or("unknown"),
        body_length = body.len(),
        "sentry_webhook_received"
    );

    if !state.config.sentry_enabled {
        warn!("sentry_webhook_disabled");
        return Err(WebhookError::SourceDisabled("sentry"));
    }

    let signature = headers.get(SENTRY_SIGNATURE_HEADER);

    if let (Some(signature), Some(secret)) = (signature, state.config.sentry_client_secret.as_deref()) {
        let signature = signature.to_str().unwrap_or_default();
        if !verify_sentry_signature(secret, &body, signature) {
            warn!("sentry_signature_invalid");
            return Err(WebhookError::InvalidSignature);
        }
    }

    let event = if signature.is_none() {
        classify_sentry(false, &serde_json::Value::Null)
    } else {
        let value = parse_body(&body).map_err(|e| {
            warn!(error = %e, "sentry_body_invalid_json");
            WebhookError::MalformedBody(e)
        })?;
        classify_sentry(true, &value)
    };

    match event {
        SentryEvent::IgnoredPing => {
            info!("sentry_unsigned_request_ignored");
            return Ok(StatusCode::NO_CONTENT.into_response());
        }
        SentryEvent::Issue(action, payload) => {
            info!(
                action = action.as_str(),
                title = %payload.data.issue.title,
                "sentry_issue_accepted"
            );
            spawn_dispatch(&state, format_issue(action, &payload));
        }
        SentryEvent::IgnoredAction { action } => {
            info!(action = %action, "sentry_issue_ignored");
        }
        SentryEvent::RawIssue(payload) => {
            info!(
                project = %payload.project,
                title = %payload.event.title,
                "sentry_raw_issue_accepted"
            );
            spawn_dispatch(&state, format_raw_issue(&payload));
        }
        SentryEvent::Unrecognized => {
            warn!("sentry_payload_unrecognized");
            return Err(WebhookError::UnrecognizedPayload);
        }
    }

    Ok(ack().into_response())
}

fn spawn_dispatch(state: &AppState, message: OutboundMessage) {
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move { dispatcher.dispatch(message).await });
}
