//! Server-managed resources.
//!
//! Judges and routers live server-side, addressed by a full resource name
//! ("organizations/{org}/judges/{id}") and versioned remotely: updates are
//! non-destructive and bump the version, and pinned versions stay readable.
//! The structs here are the client's immutable snapshots of that state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Extract the trailing id segment from a full resource name.
///
/// Works for bare ids too: a name without `/` is returned unchanged.
pub fn id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// A judge resource: a server-side evaluator configured by a judge spec.
///
/// Instances come from [`JudgesClient`] calls; they are never constructed
/// directly. Updating a judge goes through the client and produces a new
/// version, leaving previous versions readable.
///
/// [`JudgesClient`]: https://docs.rs/martian-client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Judge {
    /// Full resource name ("organizations/{org}/judges/{id}").
    pub name: String,

    /// Version number, incremented by each update.
    pub version: u32,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Creation timestamp (RFC 3339).
    pub create_time: DateTime<Utc>,

    /// The judge's configuration as returned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge_spec: Option<JsonValue>,
}

impl Judge {
    /// The short identifier: the last segment of the resource name.
    pub fn id(&self) -> &str {
        id_from_name(&self.name)
    }
}

/// A router resource: a server-side model selector.
///
/// A freshly created router only routes to its base model. Training it (via
/// `RoutersClient::run_training_job`) teaches it to route between all the
/// models it was trained on, steered per-request by a routing constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    /// Full resource name ("organizations/{org}/routers/{id}").
    pub name: String,

    /// Version number, incremented by each update.
    pub version: u32,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Creation timestamp (RFC 3339).
    pub create_time: DateTime<Utc>,

    /// The router's configuration (frontier points and executors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub router_spec: Option<JsonValue>,
}

impl Router {
    /// The short identifier: the last segment of the resource name.
    pub fn id(&self) -> &str {
        id_from_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_full_name() {
        assert_eq!(id_from_name("organizations/org-1/judges/my-judge"), "my-judge");
        assert_eq!(id_from_name("bare-id"), "bare-id");
    }

    #[test]
    fn test_judge_deserializes_camel_case() {
        let judge: Judge = serde_json::from_value(serde_json::json!({
            "name": "organizations/org-1/judges/helpfulness",
            "version": 2,
            "description": "Scores helpfulness",
            "createTime": "2025-03-01T12:00:00Z",
            "judgeSpec": { "model_type": "rubric_judge" }
        }))
        .unwrap();

        assert_eq!(judge.id(), "helpfulness");
        assert_eq!(judge.version, 2);
        assert!(judge.judge_spec.is_some());
    }

    #[test]
    fn test_router_tolerates_missing_spec() {
        let router: Router = serde_json::from_value(serde_json::json!({
            "name": "organizations/org-1/routers/support-router",
            "version": 1,
            "description": "",
            "createTime": "2025-03-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(router.id(), "support-router");
        assert!(router.router_spec.is_none());
    }
}
