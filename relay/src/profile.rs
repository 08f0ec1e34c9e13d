//! GitHub profile lookups for sponsor display names.
//!
//! Sponsorship payloads only carry logins. When an account object includes
//! its REST API `url`, the profile is fetched to read the display name. Any
//! failure degrades to the login; lookups never block a notification.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::event::{SponsorshipPayload, UserMetadata};
use crate::format::DisplayNames;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("profile request returned status {0}")]
    Status(reqwest::StatusCode),
}

/// The subset of a GitHub user profile the relay reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Resolves display names through the GitHub REST API.
#[derive(Clone)]
pub struct ProfileClient {
    client: Client,
    token: Option<String>,
    enabled: bool,
}

impl ProfileClient {
    pub fn new(client: Client, token: Option<String>, enabled: bool) -> Self {
        Self {
            client,
            token,
            enabled,
        }
    }

    /// Fetch a profile from its API URL.
    pub async fn fetch(&self, url: &str) -> Result<Profile, ProfileError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::Status(status));
        }

        Ok(response.json::<Profile>().await?)
    }

    /// Display name for an account, or `None` to fall back to its login.
    async fn display_name(&self, user: &UserMetadata) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let url = user.url.as_deref()?;

        match self.fetch(url).await {
            Ok(profile) => {
                info!(
                    login = %profile.login,
                    has_name = profile.name.is_some(),
                    "profile_lookup_complete"
                );
                profile.name
            }
            Err(e) => {
                warn!(login = %user.login, error = %e, "profile_lookup_failed");
                None
            }
        }
    }

    /// Resolve both display names of a sponsorship.
    pub async fn resolve(&self, payload: &SponsorshipPayload) -> DisplayNames {
        let (sponsor, sponsorable) = tokio::join!(
            self.display_name(&payload.sponsorship.sponsor),
            self.display_name(&payload.sponsorship.sponsorable),
        );
        DisplayNames::resolve(payload, sponsor, sponsorable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{routing::get, Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn profile_server() -> String {
        let app = Router::new()
            .route(
                "/users/alice",
                get(|| async { Json(json!({ "login": "alice", "name": "Alice Liddell" })) }),
            )
            .route(
                "/users/bob",
                get(|| async { Json(json!({ "login": "bob", "name": null })) }),
            );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn payload(base: &str) -> SponsorshipPayload {
        serde_json::from_value(json!({
            "action": "created",
            "sponsorship": {
                "sponsor": { "login": "alice", "url": format!("{base}/users/alice") },
                "sponsorable": { "login": "bob", "url": format!("{base}/users/bob") },
                "tier": { "name": "Gold", "monthly_price_in_dollars": 10 },
                "created_at": "2021-01-01T00:00:00Z"
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_uses_names_and_null_fallback() {
        let base = profile_server().await;
        let profiles = ProfileClient::new(Client::new(), None, true);

        let names = profiles.resolve(&payload(&base)).await;

        assert_eq!(names.sponsor, "Alice Liddell");
        assert_eq!(names.sponsorable, "bob");
    }

    #[tokio::test]
    async fn test_resolve_disabled_uses_logins() {
        let base = profile_server().await;
        let profiles = ProfileClient::new(Client::new(), None, false);

        let names = profiles.resolve(&payload(&base)).await;

        assert_eq!(names.sponsor, "alice");
        assert_eq!(names.sponsorable, "bob");
    }

    #[tokio::test]
    async fn test_resolve_missing_profile_falls_back() {
        let base = profile_server().await;
        let profiles = ProfileClient::new(Client::new(), None, true);

        let mut payload = payload(&base);
        payload.sponsorship.sponsor.url = Some(format!("{base}/users/nobody"));

        let names = profiles.resolve(&payload).await;
        assert_eq!(names.sponsor, "alice");
    }
}
