//! GitHub Sponsors notifications.

use crate::event::{SponsorTier, SponsorshipAction, SponsorshipPayload};

use super::date::format_timestamp;
use super::{Embed, OutboundMessage};

/// Embed color for every sponsorship notification.
pub const SPONSORS_COLOR: u32 = 0x4D4F9C;

/// Display names for both sides of a sponsorship.
///
/// Built from profile lookups when available; a missing or null name falls
/// back to the account login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNames {
    pub sponsor: String,
    pub sponsorable: String,
}

impl DisplayNames {
    /// Use the logins from the payload as display names.
    pub fn from_logins(payload: &SponsorshipPayload) -> Self {
        DisplayNames {
            sponsor: payload.sponsorship.sponsor.login.clone(),
            sponsorable: payload.sponsorship.sponsorable.login.clone(),
        }
    }

    /// Combine looked-up names with logins, preferring non-empty names.
    pub fn resolve(
        payload: &SponsorshipPayload,
        sponsor_name: Option<String>,
        sponsorable_name: Option<String>,
    ) -> Self {
        let logins = Self::from_logins(payload);
        DisplayNames {
            sponsor: non_blank(sponsor_name).unwrap_or(logins.sponsor),
            sponsorable: non_blank(sponsorable_name).unwrap_or(logins.sponsorable),
        }
    }
}

fn non_blank(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.trim().is_empty())
}

/// Monthly price as whole dollars, e.g. `$10`.
///
/// Cents are never shown; when only a cents figure is present it is
/// truncated to whole dollars.
pub fn format_price(tier: &SponsorTier) -> String {
    let dollars = match (tier.monthly_price_in_dollars, tier.monthly_price_in_cents) {
        (Some(dollars), _) => dollars.trunc().max(0.0) as u64,
        (None, Some(cents)) => cents / 100,
        (None, None) => 0,
    };
    format!("${dollars}")
}

fn tier_line(tier: &SponsorTier) -> String {
    format!("{} ({})", tier.name, format_price(tier))
}

fn tier_change_line(payload: &SponsorshipPayload) -> String {
    let from = payload
        .previous_tier()
        .map(tier_line)
        .unwrap_or_else(|| "Unknown ($0)".to_string());
    format!("{} -> {}", from, tier_line(&payload.sponsorship.tier))
}

fn effective_date(payload: &SponsorshipPayload) -> String {
    payload
        .effective_date()
        .map(format_timestamp)
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Format a sponsorship event.
pub fn format_sponsorship(
    action: SponsorshipAction,
    payload: &SponsorshipPayload,
    names: &DisplayNames,
) -> OutboundMessage {
    let sponsorship = &payload.sponsorship;
    let joined = format!("• **Joined At**: {}", format_timestamp(&sponsorship.created_at));
    let tier = format!("• **Tier**: {}", tier_line(&sponsorship.tier));

    let (title, lines) = match action {
        SponsorshipAction::Created => (
            format!("[ 🎉 {} sponsored {} ]", names.sponsor, names.sponsorable),
            vec![joined, tier],
        ),
        SponsorshipAction::PendingCancellation => (
            format!(
                "[ ✏️ {} is cancelling their sponsorship with {} ]",
                names.sponsor, names.sponsorable
            ),
            vec![
                format!("• **Effective Date**: {}", effective_date(payload)),
                joined,
                tier,
            ],
        ),
        SponsorshipAction::Cancelled => (
            format!(
                "[ ✏️ {} cancelled their sponsorship with {} ]",
                names.sponsor, names.sponsorable
            ),
            vec![joined, tier],
        ),
        SponsorshipAction::PendingTierChange => (
            format!("[ ✏️ Pending Tier Change for {} ]", names.sponsor),
            vec![
                format!("• **Effective Date**: {}", effective_date(payload)),
                joined,
                format!("• **From -> To Tier**: {}", tier_change_line(payload)),
            ],
        ),
        SponsorshipAction::TierChanged => (
            format!("[ ✏️ {} changed tiers ]", names.sponsor),
            vec![
                joined,
                format!("• **From -> To Tier**: {}", tier_change_line(payload)),
            ],
        ),
    };

    OutboundMessage {
        username: Some(names.sponsor.clone()),
        avatar_url: sponsorship.sponsor.avatar_url.clone(),
        content: None,
        embeds: vec![Embed::new(title, SPONSORS_COLOR)
            .description(lines.join("\n"))
            .url(sponsorship.sponsor.html_url.as_deref())],
    }
}
