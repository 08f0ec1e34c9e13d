//! GitHub Sponsors webhook payloads.
//!
//! Reference: https://docs.github.com/en/webhooks/webhook-events-and-payloads#sponsorship

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Hook type GitHub reports when a Sponsors listing webhook is first set up.
pub const SPONSORS_LISTING_HOOK: &str = "SponsorsListing";

/// A classified GitHub Sponsors request body.
#[derive(Debug, Clone, PartialEq)]
pub enum SponsorsEvent {
    /// The ping GitHub sends when the webhook is created
    SetupPing(SetupPing),
    /// A sponsorship lifecycle event with a known action
    Sponsorship(SponsorshipAction, Box<SponsorshipPayload>),
    /// A sponsorship envelope with an action we do not format
    Ignored { action: String },
    /// Anything else
    Unrecognized,
}

/// Sponsorship actions that produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SponsorshipAction {
    Created,
    Cancelled,
    TierChanged,
    PendingCancellation,
    PendingTierChange,
}

impl SponsorshipAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "created" => Some(Self::Created),
            "cancelled" => Some(Self::Cancelled),
            "tier_changed" => Some(Self::TierChanged),
            "pending_cancellation" => Some(Self::PendingCancellation),
            "pending_tier_change" => Some(Self::PendingTierChange),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Cancelled => "cancelled",
            Self::TierChanged => "tier_changed",
            Self::PendingCancellation => "pending_cancellation",
            Self::PendingTierChange => "pending_tier_change",
        }
    }
}

/// Webhook setup ping.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SetupPing {
    #[serde(default)]
    pub hook_id: Option<u64>,
    #[serde(default)]
    pub zen: Option<String>,
}

/// Body of a `sponsorship` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorshipPayload {
    pub action: String,
    pub sponsorship: Sponsorship,
    /// Set for `pending_cancellation` and `pending_tier_change`
    #[serde(default)]
    pub effective_date: Option<String>,
    /// Set for `tier_changed` and `pending_tier_change`
    #[serde(default)]
    pub changes: Option<SponsorshipChanges>,
    #[serde(default)]
    pub sender: Option<UserMetadata>,
}

impl SponsorshipPayload {
    /// Effective date, read from the envelope or from the sponsorship object.
    pub fn effective_date(&self) -> Option<&str> {
        self.effective_date
            .as_deref()
            .or(self.sponsorship.effective_date.as_deref())
    }

    /// The tier the sponsor moved away from, if the event carries one.
    pub fn previous_tier(&self) -> Option<&SponsorTier> {
        self.changes
            .as_ref()
            .or(self.sponsorship.changes.as_ref())
            .and_then(|c| c.tier.as_ref())
            .map(|t| &t.from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sponsorship {
    pub sponsor: UserMetadata,
    pub sponsorable: UserMetadata,
    pub tier: SponsorTier,
    pub created_at: String,
    #[serde(default)]
    pub privacy_level: Option<String>,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub changes: Option<SponsorshipChanges>,
}

/// A GitHub account as embedded in webhook payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub login: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// REST API URL of the account, used for display name lookups
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorTier {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub monthly_price_in_dollars: Option<f64>,
    #[serde(default)]
    pub monthly_price_in_cents: Option<u64>,
    #[serde(default)]
    pub is_one_time: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SponsorshipChanges {
    #[serde(default)]
    pub tier: Option<TierChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierChange {
    pub from: SponsorTier,
}

/// Classify a GitHub Sponsors request body.
pub fn classify_sponsors(body: &Value) -> SponsorsEvent {
    if let Some(hook) = body.get("hook") {
        if hook.get("type").and_then(Value::as_str) == Some(SPONSORS_LISTING_HOOK) {
            let ping = SetupPing::deserialize(body).unwrap_or_default();
            info!(hook_id = ?ping.hook_id, "sponsors_setup_ping");
            return SponsorsEvent::SetupPing(ping);
        }
    }

    let (Some(action), true) = (body.get("action"), body.get("sponsorship").is_some()) else {
        return SponsorsEvent::Unrecognized;
    };

    let Some(action) = action.as_str() else {
        warn!("sponsors_action_not_a_string");
        return SponsorsEvent::Unrecognized;
    };

    let Some(kind) = SponsorshipAction::parse(action) else {
        info!(action = %action, "sponsors_action_ignored");
        return SponsorsEvent::Ignored {
            action: action.to_string(),
        };
    };

    match SponsorshipPayload::deserialize(body) {
        Ok(payload) => SponsorsEvent::Sponsorship(kind, Box::new(payload)),
        Err(e) => {
            warn!(action = %action, error = %e, "sponsors_payload_invalid");
            SponsorsEvent::Unrecognized
        }
    }
}
