//! Discord webhook dispatcher.
//!
//! Posts formatted messages to the configured Discord webhook with
//! `?wait=true`. There is no retry: a failed delivery is logged and dropped,
//! and the upstream caller is never told about it.

use std::sync::Arc;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

use crate::format::OutboundMessage;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("request to Discord failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Discord responded with status {0}")]
    Status(StatusCode),
}

/// Result of a dispatch attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Discord accepted the message
    Sent,
    /// No webhook URL is configured
    Skipped,
}

/// Posts messages to a Discord webhook.
///
/// Cheap to clone; all clones share one HTTP client.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    client: Client,
    url: Option<Url>,
}

impl Dispatcher {
    /// Create a dispatcher. `webhook_url` of `None` turns dispatch into a no-op.
    pub fn new(client: Client, webhook_url: Option<Url>) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                client,
                url: webhook_url.map(with_wait),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.url.is_some()
    }

    /// Send a message and wait for Discord's response.
    pub async fn send(&self, message: &OutboundMessage) -> Result<Delivery, DispatchError> {
        let Some(url) = self.inner.url.as_ref() else {
            return Ok(Delivery::Skipped);
        };

        let response = self
            .inner
            .client
            .post(url.clone())
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status));
        }

        Ok(Delivery::Sent)
    }

    /// Send a message, logging the outcome instead of returning it.
    pub async fn dispatch(&self, message: OutboundMessage) {
        let title = message
            .embeds
            .first()
            .map(|e| e.title.clone())
            .unwrap_or_default();

        match self.send(&message).await {
            Ok(Delivery::Sent) => info!(title = %title, "dispatch_sent"),
            Ok(Delivery::Skipped) => info!(title = %title, "dispatch_skipped_no_webhook"),
            Err(DispatchError::Status(status)) => {
                error!(title = %title, status_code = status.as_u16(), "dispatch_rejected")
            }
            Err(e) => error!(title = %title, error = %e, "dispatch_failed"),
        }
    }
}

/// Append `wait=true` to the webhook URL, keeping any existing query pairs.
fn with_wait(mut url: Url) -> Url {
    let has_wait = url.query_pairs().any(|(k, _)| k == "wait");
    if !has_wait {
        url.query_pairs_mut().append_pair("wait", "true");
    }
    url
}
