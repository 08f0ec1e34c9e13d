//! Sentry issue notifications.

use crate::event::sentry::{Frame, Issue};
use crate::event::{IssueAction, IssuePayload, RawIssuePayload};

use super::date::format_timestamp;
use super::{Embed, OutboundMessage};

pub const CREATED_COLOR: u32 = 0xE74C3C;
pub const RESOLVED_COLOR: u32 = 0x2ECC71;
pub const IGNORED_COLOR: u32 = 0x95A5A6;
pub const ASSIGNED_COLOR: u32 = 0x3498DB;
pub const RAW_ISSUE_COLOR: u32 = 0xE67E22;

const UNKNOWN: &str = "Unknown";

fn or_unknown(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn timestamp_or_unknown(value: Option<&str>) -> String {
    value
        .map(format_timestamp)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// `<culprit> (<filename>)`, dropping whichever half is missing.
fn culprit(issue: &Issue) -> String {
    let filename = issue
        .metadata
        .as_ref()
        .and_then(|m| m.filename.as_deref())
        .filter(|f| !f.is_empty());
    let culprit = issue.culprit.as_deref().filter(|c| !c.is_empty());

    match (culprit, filename) {
        (Some(c), Some(f)) => format!("{c} ({f})"),
        (Some(c), None) => c.to_string(),
        (None, Some(f)) => f.to_string(),
        (None, None) => UNKNOWN.to_string(),
    }
}

fn issue_label(issue: &Issue) -> String {
    issue
        .short_id
        .clone()
        .or_else(|| {
            issue
                .project
                .as_ref()
                .and_then(|p| p.name.clone().or_else(|| p.slug.clone()))
        })
        .unwrap_or_else(|| "Sentry".to_string())
}

/// Format an integration platform issue event.
pub fn format_issue(action: IssueAction, payload: &IssuePayload) -> OutboundMessage {
    let issue = &payload.data.issue;

    let (content, color) = match action {
        IssueAction::Created => ("🚨 New issue", CREATED_COLOR),
        IssueAction::Resolved => ("✅ Issue resolved", RESOLVED_COLOR),
        IssueAction::Ignored => ("🔕 Issue ignored", IGNORED_COLOR),
        IssueAction::Assigned => ("👤 Issue assigned", ASSIGNED_COLOR),
    };

    let mut embed = Embed::new(format!("[ {} ] {}", issue_label(issue), issue.title), color)
        .url(issue.link());

    if action == IssueAction::Assigned {
        let actor = payload
            .actor
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or("Someone");
        let assignee = issue
            .assigned_to
            .as_ref()
            .and_then(|a| a.name.as_deref().or(a.email.as_deref()))
            .unwrap_or("nobody");
        embed = embed.description(format!("{actor} assigned this issue to {assignee}"));
    }

    embed = embed
        .field("Platform", or_unknown(issue.platform.as_deref()), true)
        .field("First Seen", timestamp_or_unknown(issue.first_seen.as_deref()), true)
        .field("Last Seen", timestamp_or_unknown(issue.last_seen.as_deref()), true)
        .field("Culprit", culprit(issue), false);

    if let Some(status) = issue.status.as_deref() {
        embed = embed.field("Status", status, true);
    }

    OutboundMessage {
        username: None,
        avatar_url: None,
        content: Some(content.to_string()),
        embeds: vec![embed],
    }
}

/// Pick the frame to show: the innermost in-app frame, else the innermost.
fn top_frame(frames: &[Frame]) -> Option<&Frame> {
    frames
        .iter()
        .rev()
        .find(|f| f.in_app == Some(true))
        .or_else(|| frames.last())
}

fn frame_location(frame: &Frame) -> String {
    let function = frame.function.as_deref().unwrap_or("<anonymous>");
    let filename = frame.filename.as_deref().unwrap_or("<unknown>");
    match frame.lineno {
        Some(line) => format!("{function} @ {filename}:{line}"),
        None => format!("{function} @ {filename}"),
    }
}

/// Format a legacy plugin new-issue notification.
pub fn format_raw_issue(payload: &RawIssuePayload) -> OutboundMessage {
    let event = &payload.event;
    let project = payload.project_name.as_deref().unwrap_or(&payload.project);

    let mut embed = Embed::new(format!("[ {} ] {}", project, event.title), RAW_ISSUE_COLOR)
        .url(payload.url.as_deref())
        .field("Platform", or_unknown(event.platform.as_deref()), true)
        .field("Environment", or_unknown(event.environment.as_deref()), true);

    if let Some(tags) = event.tags.as_ref().filter(|t| !t.is_empty()) {
        let lines: Vec<String> = tags
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        embed = embed.field("Tags", lines.join("\n"), false);
    }

    let frame = event
        .stacktrace
        .as_ref()
        .and_then(|s| top_frame(&s.frames));
    if let Some(frame) = frame {
        embed = embed.field("Location", frame_location(frame), false);
    }

    OutboundMessage {
        username: None,
        avatar_url: None,
        content: Some(format!("🚨 New issue in **{}**", project)),
        embeds: vec![embed],
    }
}
