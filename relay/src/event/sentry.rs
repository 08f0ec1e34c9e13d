//! Sentry webhook payloads.
//!
//! Two shapes arrive on the same route:
//! - integration platform `issue` webhooks, which carry an `action`
//! - legacy plugin webhooks, a flat new-issue notification without one

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// A classified Sentry request.
#[derive(Debug, Clone, PartialEq)]
pub enum SentryEvent {
    /// Unsigned request, acknowledged and dropped
    IgnoredPing,
    /// Integration platform issue event with a known action
    Issue(IssueAction, Box<IssuePayload>),
    /// Integration platform event with an action we do not format
    IgnoredAction { action: String },
    /// Legacy plugin new-issue notification
    RawIssue(Box<RawIssuePayload>),
    /// Anything else
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueAction {
    Created,
    Resolved,
    Ignored,
    Assigned,
}

impl IssueAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "created" => Some(Self::Created),
            "resolved" => Some(Self::Resolved),
            "ignored" => Some(Self::Ignored),
            "assigned" => Some(Self::Assigned),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Resolved => "resolved",
            Self::Ignored => "ignored",
            Self::Assigned => "assigned",
        }
    }
}

// =============================================================================
// Integration platform payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePayload {
    pub action: String,
    pub data: IssueData,
    #[serde(default)]
    pub actor: Option<Actor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueData {
    pub issue: Issue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub title: String,
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(default)]
    pub culprit: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub first_seen: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default, rename = "web_url")]
    pub web_url: Option<String>,
    #[serde(default)]
    pub metadata: Option<IssueMetadata>,
    #[serde(default)]
    pub project: Option<ProjectRef>,
    #[serde(default)]
    pub assigned_to: Option<Assignee>,
}

impl Issue {
    pub fn link(&self) -> Option<&str> {
        self.permalink.as_deref().or(self.web_url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// =============================================================================
// Legacy plugin payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIssuePayload {
    pub project: String,
    pub event: RawEvent,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub culprit: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub title: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    /// `[name, value]` pairs
    #[serde(default)]
    pub tags: Option<Vec<(String, String)>>,
    #[serde(default)]
    pub stacktrace: Option<Stacktrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stacktrace {
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub lineno: Option<u64>,
    #[serde(default)]
    pub in_app: Option<bool>,
}

/// Classify a Sentry request.
///
/// `signed` reports whether the request carried a `Sentry-Hook-Signature`
/// header; unsigned requests are never inspected further.
pub fn classify_sentry(signed: bool, body: &Value) -> SentryEvent {
    if !signed {
        return SentryEvent::IgnoredPing;
    }

    let Some(action) = body.get("action") else {
        return match RawIssuePayload::deserialize(body) {
            Ok(payload) => SentryEvent::RawIssue(Box::new(payload)),
            Err(e) => {
                warn!(error = %e, "sentry_raw_payload_invalid");
                SentryEvent::Unrecognized
            }
        };
    };

    let Some(action) = action.as_str() else {
        warn!("sentry_action_not_a_string");
        return SentryEvent::Unrecognized;
    };

    let Some(kind) = IssueAction::parse(action) else {
        info!(action = %action, "sentry_action_ignored");
        return SentryEvent::IgnoredAction {
            action: action.to_string(),
        };
    };

    match IssuePayload::deserialize(body) {
        Ok(payload) => SentryEvent::Issue(kind, Box::new(payload)),
        Err(e) => {
            warn!(action = %action, error = %e, "sentry_issue_payload_invalid");
            SentryEvent::Unrecognized
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_body(action: &str) -> Value {
        json!({
            "action": action,
            "installation": { "uuid": "7a485448-a9e2-4c85-8a3c-4f44175783c9" },
            "data": {
                "issue": {
                    "id": "1170820242",
                    "shortId": "PYTHON-1",
                    "title": "ZeroDivisionError: division by zero",
                    "culprit": "app.views in index",
                    "platform": "python",
                    "firstSeen": "2019-08-19T20:58:37.391000Z",
                    "lastSeen": "2019-08-19T20:58:37Z",
                    "status": "unresolved",
                    "metadata": { "filename": "app/views.py", "type": "ZeroDivisionError" },
                    "project": { "name": "python", "slug": "python" }
                }
            },
            "actor": { "type": "application", "id": "sentry", "name": "Sentry" }
        })
    }

    #[test]
    fn test_classify_unsigned() {
        assert_eq!(classify_sentry(false, &issue_body("created")), SentryEvent::IgnoredPing);
        assert_eq!(classify_sentry(false, &Value::Null), SentryEvent::IgnoredPing);
    }

    #[test]
    fn test_classify_issue_actions() {
        for action in ["created", "resolved", "ignored", "assigned"] {
            match classify_sentry(true, &issue_body(action)) {
                SentryEvent::Issue(kind, payload) => {
                    assert_eq!(kind.as_str(), action);
                    assert_eq!(payload.data.issue.short_id.as_deref(), Some("PYTHON-1"));
                    assert_eq!(
                        payload.data.issue.metadata.as_ref().and_then(|m| m.filename.as_deref()),
                        Some("app/views.py")
                    );
                }
                other => panic!("{action} classified as {other:?}"),
            }
        }
    }

    #[test]
    fn test_classify_unknown_action() {
        assert_eq!(
            classify_sentry(true, &issue_body("archived")),
            SentryEvent::IgnoredAction {
                action: "archived".to_string()
            }
        );
    }

    #[test]
    fn test_classify_issue_without_data() {
        let body = json!({ "action": "created", "data": {} });
        assert_eq!(classify_sentry(true, &body), SentryEvent::Unrecognized);
    }

    #[test]
    fn test_classify_raw_issue() {
        let body = json!({
            "project": "backend",
            "url": "https://sentry.io/organizations/acme/issues/1/",
            "event": {
                "title": "TypeError: undefined is not a function",
                "platform": "node",
                "environment": "production",
                "tags": [["level", "error"], ["os", "linux"]],
                "stacktrace": { "frames": [{ "filename": "index.js", "function": "main", "lineno": 12 }] }
            }
        });

        match classify_sentry(true, &body) {
            SentryEvent::RawIssue(payload) => {
                assert_eq!(payload.project, "backend");
                assert_eq!(payload.event.tags.as_ref().map(Vec::len), Some(2));
                assert_eq!(payload.event.stacktrace.as_ref().map(|s| s.frames.len()), Some(1));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_classify_unrecognized_shape() {
        assert_eq!(classify_sentry(true, &json!({ "foo": "bar" })), SentryEvent::Unrecognized);
        assert_eq!(classify_sentry(true, &json!({ "action": 5 })), SentryEvent::Unrecognized);
        assert_eq!(classify_sentry(true, &json!(null)), SentryEvent::Unrecognized);
    }
}
