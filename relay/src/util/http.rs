//! Outbound HTTP client construction.

use std::time::Duration;

use reqwest::Client;

/// User agent sent on every outbound request.
pub const USER_AGENT: &str = concat!("webhook-relay (v", env!("CARGO_PKG_VERSION"), ")");

/// Build the client shared by the dispatcher and profile lookups.
///
/// Without a timeout the transport default applies.
pub fn build_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent() {
        assert!(USER_AGENT.starts_with("webhook-relay (v"));
        assert!(USER_AGENT.ends_with(')'));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(None).is_ok());
        assert!(build_client(Some(Duration::from_secs(5))).is_ok());
    }
}
