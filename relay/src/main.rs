//! Webhook relay server.
//!
//! Receives GitHub Sponsors and Sentry webhooks, verifies them, and posts
//! formatted notifications to a Discord webhook.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use relay::{router, AppState, Config, Environment};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let environment = env::var("NODE_ENV")
        .ok()
        .and_then(|v| Environment::parse(&v))
        .unwrap_or_default();
    init_logging(environment);

    match dotenv {
        Ok(path) => info!(path = %path.display(), "dotenv_loaded"),
        Err(e) if e.not_found() => info!("dotenv_not_found"),
        Err(e) => warn!(error = %e, "dotenv_invalid"),
    }

    info!("relay_starting");

    let config = Config::from_env().context("Invalid configuration")?;
    info!(
        port = config.port,
        environment = %config.environment,
        discord_webhook_configured = config.discord_webhook_url.is_some(),
        secret_configured = config.secret.is_some(),
        github_enabled = config.github_enabled,
        sentry_enabled = config.sentry_enabled,
        sentry_signature_checked = config.sentry_client_secret.is_some(),
        profile_lookup = config.sponsor_profile_lookup,
        "config_loaded"
    );

    if config.github_enabled && config.secret.is_none() {
        warn!("github_secret_not_configured");
    }
    if config.discord_webhook_url.is_none() {
        warn!("discord_webhook_not_configured");
    }

    let port = config.port;
    let state = AppState::new(config).context("Failed to build HTTP client")?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "relay_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("relay_shutdown_complete");

    Ok(())
}

/// Human-readable logs in development, flattened JSON otherwise.
fn init_logging(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (pretty, json) = if environment.is_development() {
        (Some(fmt::layer().pretty()), None)
    } else {
        (None, Some(fmt::layer().json().flatten_event(true)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_shutting_down");
}
