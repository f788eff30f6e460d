//! The judges sub-client.

use std::sync::Arc;

use martian_core::{
    validate_resource_id, ChatCompletion, CompletionRequest, Judge, JudgeEvaluation, JudgeSpec,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cache::ResourceCache;
use crate::error::{ClientError, Result};
use crate::http::Transport;
use crate::usage::UsageTracker;

/// Wire envelope for create/update payloads. The API nests the spec one level
/// deeper than you'd expect: `{"judgeSpec": {"judgeSpec": {...}}}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JudgeSpecEnvelope<'a> {
    judge_spec: &'a JudgeSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JudgePayload<'a> {
    judge_spec: JudgeSpecEnvelope<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateJudgeBody<'a> {
    judge: &'a str,
    judge_version: u32,
    completion_create_params: &'a CompletionRequest,
    chat_completion: &'a ChatCompletion,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateSpecBody<'a> {
    judge_spec: &'a JudgeSpec,
    completion_create_params: &'a CompletionRequest,
    chat_completion: &'a ChatCompletion,
}

#[derive(Deserialize)]
struct ListJudgesResponse {
    #[serde(default)]
    judges: Vec<Judge>,
}

/// Client for the judges API: create, list, get, update and evaluate.
///
/// Obtained from [`MartianClient::judges`](crate::MartianClient::judges).
#[derive(Clone)]
pub struct JudgesClient {
    transport: Arc<Transport>,
    cache: Arc<ResourceCache>,
    usage: Arc<UsageTracker>,
}

impl JudgesClient {
    pub(crate) fn new(
        transport: Arc<Transport>,
        cache: Arc<ResourceCache>,
        usage: Arc<UsageTracker>,
    ) -> Self {
        Self {
            transport,
            cache,
            usage,
        }
    }

    /// Create a judge under a caller-chosen id.
    ///
    /// The spec is validated locally and the id checked for collisions before
    /// anything is sent: the server's own duplicate handling is an opaque 500.
    pub async fn create(
        &self,
        judge_id: &str,
        spec: &JudgeSpec,
        description: Option<&str>,
    ) -> Result<Judge> {
        validate_resource_id(judge_id)?;
        spec.validate()?;
        if self.exists(judge_id).await? {
            return Err(ClientError::AlreadyExists(format!("judges/{judge_id}")));
        }

        let payload = JudgePayload {
            judge_spec: JudgeSpecEnvelope { judge_spec: spec },
            description,
        };
        let judge: Judge = self
            .transport
            .post_json("/judges", &[("judgeId", judge_id.to_string())], &payload)
            .await?;
        info!(judge = %judge.name, version = judge.version, "created judge");
        Ok(judge)
    }

    /// List every judge in the organization (latest versions).
    pub async fn list(&self) -> Result<Vec<Judge>> {
        let response: ListJudgesResponse = self.transport.get_json("/judges", &[]).await?;
        Ok(response.judges)
    }

    /// Get a judge, optionally pinned to a version.
    ///
    /// Pinned versions are immutable and served from the client cache when
    /// possible; the latest version is always fetched.
    pub async fn get(&self, judge_id: &str, version: Option<u32>) -> Result<Judge> {
        if let Some(version) = version {
            if let Some(judge) = self.cache.get_judge(judge_id, version).await {
                debug!(judge = judge_id, version, "judge served from cache");
                return Ok(judge);
            }
        }

        let query: Vec<(&str, String)> = version
            .map(|v| ("version", v.to_string()))
            .into_iter()
            .collect();
        let judge: Judge = self
            .transport
            .get_json(&format!("/judges/{judge_id}"), &query)
            .await?;

        if version.is_some() {
            self.cache.insert_judge(judge.clone()).await;
        }
        Ok(judge)
    }

    /// Whether a judge with this id exists.
    pub async fn exists(&self, judge_id: &str) -> Result<bool> {
        match self
            .transport
            .get_json::<Judge>(&format!("/judges/{judge_id}"), &[])
            .await
        {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Replace a judge's spec and/or description.
    ///
    /// Updates are non-destructive: the returned judge carries an incremented
    /// version, and previous versions stay readable via [`get`](Self::get).
    pub async fn update(
        &self,
        judge_id: &str,
        spec: &JudgeSpec,
        description: Option<&str>,
    ) -> Result<Judge> {
        spec.validate()?;

        let payload = JudgePayload {
            judge_spec: JudgeSpecEnvelope { judge_spec: spec },
            description,
        };
        let judge: Judge = self
            .transport
            .patch_json(&format!("/judges/{judge_id}"), &payload)
            .await?;
        info!(judge = %judge.name, version = judge.version, "updated judge");
        Ok(judge)
    }

    /// Evaluate a completion with a saved judge (pinned to its version).
    pub async fn evaluate(
        &self,
        judge: &Judge,
        completion_request: &CompletionRequest,
        completion: &ChatCompletion,
    ) -> Result<JudgeEvaluation> {
        let body = EvaluateJudgeBody {
            judge: &judge.name,
            judge_version: judge.version,
            completion_create_params: completion_request,
            chat_completion: completion,
        };
        let evaluation: JudgeEvaluation =
            self.transport.post_json_long("/judges:evaluate", &body).await?;
        self.usage.record_evaluation(&evaluation);
        debug!(judge = %judge.name, score = evaluation.score, "judge evaluation complete");
        Ok(evaluation)
    }

    /// Evaluate a completion with an unsaved spec.
    ///
    /// Useful for iterating on a rubric before creating the judge.
    pub async fn evaluate_spec(
        &self,
        spec: &JudgeSpec,
        completion_request: &CompletionRequest,
        completion: &ChatCompletion,
    ) -> Result<JudgeEvaluation> {
        spec.validate()?;

        let body = EvaluateSpecBody {
            judge_spec: spec,
            completion_create_params: completion_request,
            chat_completion: completion,
        };
        let evaluation: JudgeEvaluation =
            self.transport.post_json_long("/judges:evaluate", &body).await?;
        self.usage.record_evaluation(&evaluation);
        debug!(score = evaluation.score, "spec evaluation complete");
        Ok(evaluation)
    }
}
