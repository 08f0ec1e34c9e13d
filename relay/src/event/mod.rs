//! Inbound event classification.
//!
//! Request bodies are decoded into a `serde_json::Value` first, then the
//! envelope keys decide which typed payload is deserialized. Every body maps
//! to exactly one variant; anything that does not fit a known shape becomes
//! `Unrecognized`.
//!
//! ```text
//! raw bytes → parse_body() → classify_sponsors() / classify_sentry()
//! ```

pub mod sentry;
pub mod sponsors;

use serde_json::Value;

pub use sentry::{classify_sentry, IssueAction, IssuePayload, RawIssuePayload, SentryEvent};
pub use sponsors::{
    classify_sponsors, SponsorTier, SponsorsEvent, SponsorshipAction, SponsorshipPayload,
    UserMetadata,
};

/// Decode a request body that has already passed signature checks.
pub fn parse_body(raw: &[u8]) -> Result<Value, serde_json::Error> {
    serde_json::from_slice(raw)
}
