//! Configuration module for environment variable parsing.
//!
//! All values are read once at startup and are immutable afterwards. The
//! binary loads an optional `.env` file before calling [`Config::from_env`].

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Default port the relay listens on.
pub const DEFAULT_PORT: u16 = 3621;

/// Errors that make the configuration unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DISCORD_WEBHOOK_URL is not a valid URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),
}

/// Runtime environment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord webhook that formatted messages are posted to
    pub discord_webhook_url: Option<Url>,

    /// Runtime environment mode
    pub environment: Environment,

    /// Shared secret GitHub signs webhook bodies with
    pub secret: Option<String>,

    /// Port for the web server to listen on
    pub port: u16,

    /// Whether the `/github` route accepts events
    pub github_enabled: bool,

    /// Whether the `/sentry` route accepts events
    pub sentry_enabled: bool,

    /// Sentry integration client secret for HMAC-SHA256 verification
    pub sentry_client_secret: Option<String>,

    /// Token used for GitHub profile lookups
    pub github_token: Option<String>,

    /// Whether sponsor display names are resolved through the GitHub API
    pub sponsor_profile_lookup: bool,

    /// Optional timeout for outbound HTTP calls
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            discord_webhook_url: None,
            environment: Environment::Development,
            secret: None,
            port: DEFAULT_PORT,
            github_enabled: true,
            sentry_enabled: true,
            sentry_client_secret: None,
            github_token: None,
            sponsor_profile_lookup: true,
            request_timeout: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let discord_webhook_url = match non_empty("DISCORD_WEBHOOK_URL") {
            Some(raw) => Some(Url::parse(&raw)?),
            None => None,
        };

        let environment = match non_empty("NODE_ENV") {
            Some(raw) => Environment::parse(&raw).unwrap_or_else(|| {
                warn!(env_var = "NODE_ENV", value = %raw, "Invalid environment, using default");
                Environment::default()
            }),
            None => Environment::default(),
        };

        Ok(Config {
            discord_webhook_url,
            environment,
            secret: non_empty("SECRET"),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            github_enabled: parse_bool("GITHUB_ENABLED", true),
            sentry_enabled: parse_bool("SENTRY_ENABLED", true),
            sentry_client_secret: non_empty("SENTRY_CLIENT_SECRET"),
            github_token: non_empty("GITHUB_TOKEN"),
            sponsor_profile_lookup: parse_bool("SPONSOR_PROFILE_LOOKUP", true),
            request_timeout: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_millis),
        })
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag like "true", "0" or "off".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match non_empty(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}
