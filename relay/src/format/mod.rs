//! Discord message formatting.
//!
//! Classified events are turned into an [`OutboundMessage`], the JSON body
//! Discord's execute-webhook endpoint accepts. Formatting is pure: the same
//! event always yields the same message, and every rendered date comes from a
//! timestamp in the payload.
//!
//! ## Formatting Flow
//!
//! ```text
//! SponsorsEvent / SentryEvent → format_*() → OutboundMessage → Dispatcher
//! ```

pub mod date;
pub mod sentry;
pub mod sponsors;

use serde::{Deserialize, Serialize};

pub use date::{format_timestamp, ordinal_suffix};
pub use sentry::{format_issue, format_raw_issue};
pub use sponsors::{format_price, format_sponsorship, DisplayNames};

/// Discord caps embed titles at 256 characters.
pub const MAX_TITLE_LENGTH: usize = 256;

/// Discord caps embed field values at 1024 characters.
pub const MAX_FIELD_VALUE_LENGTH: usize = 1024;

/// Discord caps embed descriptions at 4096 characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;

/// A Discord webhook message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Overrides the webhook's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Overrides the webhook's avatar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

/// A rich embed block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Embed {
            title: truncate(&title.into(), MAX_TITLE_LENGTH),
            color,
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(truncate(&description.into(), MAX_DESCRIPTION_LENGTH));
        self
    }

    pub fn url(mut self, url: Option<&str>) -> Self {
        self.url = url.map(str::to_string);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: truncate(&value.into(), MAX_FIELD_VALUE_LENGTH),
            inline,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
