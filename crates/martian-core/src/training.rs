//! Router training jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resource::id_from_name;

/// Status of a training job as reported by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainingJobStatus {
    Pending,
    Running,
    Success,
    /// Failed; the server will retry.
    Failure,
    /// Failed with all retry attempts exhausted.
    FailureWithoutRetry,
    /// A status this SDK version doesn't know about.
    #[serde(untagged)]
    Other(String),
}

impl TrainingJobStatus {
    /// Whether the job has stopped making progress. The polling loop stops on
    /// terminal statuses.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::Failure | Self::FailureWithoutRetry
        )
    }

    /// Whether the job ended successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// A router training job submitted via `RoutersClient::run_training_job`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouterTrainingJob {
    /// Full resource name of the job.
    pub name: String,

    /// Name of the router being trained.
    pub router_name: String,

    /// Name of the judge scoring candidate responses.
    pub judge_name: String,

    /// Pinned judge version used for scoring.
    pub judge_version: u32,

    /// Current job status.
    pub status: TrainingJobStatus,

    /// When the job was submitted.
    pub create_time: DateTime<Utc>,

    /// Last server-side status change.
    pub update_time: DateTime<Utc>,

    /// Models the router is being trained to route between.
    pub llms: Vec<String>,

    /// Failure detail, when the job has failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// How many times the server has retried the job.
    #[serde(default)]
    pub retry_count: u32,
}

impl RouterTrainingJob {
    /// The short job identifier: the last segment of the resource name.
    pub fn id(&self) -> &str {
        id_from_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminality() {
        assert!(TrainingJobStatus::Success.is_terminal());
        assert!(TrainingJobStatus::Failure.is_terminal());
        assert!(TrainingJobStatus::FailureWithoutRetry.is_terminal());
        assert!(!TrainingJobStatus::Pending.is_terminal());
        assert!(!TrainingJobStatus::Running.is_terminal());
        assert!(!TrainingJobStatus::Other("THROTTLED".to_string()).is_terminal());
    }

    #[test]
    fn test_deserialize_job() {
        let job: RouterTrainingJob = serde_json::from_value(serde_json::json!({
            "name": "organizations/org-1/router_training_jobs/job-42",
            "routerName": "organizations/org-1/routers/support-router",
            "judgeName": "organizations/org-1/judges/helpfulness",
            "judgeVersion": 3,
            "status": "RUNNING",
            "createTime": "2025-03-01T12:00:00Z",
            "updateTime": "2025-03-01T12:05:00Z",
            "llms": ["openai/openai/gpt-4o", "openai/openai/gpt-4o-mini"]
        }))
        .unwrap();

        assert_eq!(job.id(), "job-42");
        assert_eq!(job.status, TrainingJobStatus::Running);
        assert_eq!(job.retry_count, 0);
        assert!(job.error_message.is_none());
    }

    #[test]
    fn test_unknown_status_preserved() {
        let status: TrainingJobStatus = serde_json::from_value(serde_json::json!("PAUSED")).unwrap();
        assert_eq!(status, TrainingJobStatus::Other("PAUSED".to_string()));
    }

    #[test]
    fn test_failure_detail_round_trip() {
        let job: RouterTrainingJob = serde_json::from_value(serde_json::json!({
            "name": "jobs/j",
            "routerName": "r",
            "judgeName": "j",
            "judgeVersion": 1,
            "status": "FAILURE_WITHOUT_RETRY",
            "createTime": "2025-03-01T12:00:00Z",
            "updateTime": "2025-03-01T12:05:00Z",
            "llms": [],
            "errorMessage": "judge quota exhausted",
            "retryCount": 3
        }))
        .unwrap();

        assert!(job.status.is_terminal());
        assert!(!job.status.is_success());
        assert_eq!(job.error_message.as_deref(), Some("judge quota exhausted"));
        assert_eq!(job.retry_count, 3);
    }
}
