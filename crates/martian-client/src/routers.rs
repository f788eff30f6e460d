//! The routers sub-client.

use std::sync::Arc;
use std::time::Duration;

use martian_core::{
    id_from_name, validate_resource_id, ChatCompletion, CompletionRequest, Judge, Router,
    RouterTrainingJob, RoutingConstraint, TrainingJobStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::cache::ResourceCache;
use crate::error::{ClientError, Result};
use crate::http::Transport;
use crate::usage::UsageTracker;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouterPayload<'a> {
    router_spec: &'a JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct RunBody<'a> {
    #[serde(flatten)]
    request: &'a CompletionRequest,
    routing_constraint: &'a RoutingConstraint,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrainingJobBody<'a> {
    router_name: &'a str,
    judge_name: &'a str,
    llms: &'a [String],
    requests: &'a [CompletionRequest],
}

#[derive(Deserialize)]
struct ListRoutersResponse {
    #[serde(default)]
    routers: Vec<Router>,
}

fn model_executor_point(base_model: &str, x: f64, y: f64) -> JsonValue {
    json!({
        "point": { "x": x, "y": y },
        "executor": {
            "spec": {
                "executor_type": "ModelExecutor",
                "model_name": base_model
            }
        }
    })
}

/// The spec a router starts with: both frontier endpoints route to the base
/// model. Training replaces this with a real cost/quality frontier.
fn initial_router_spec(base_model: &str) -> JsonValue {
    json!({
        "points": [
            model_executor_point(base_model, 0.0, 0.0),
            model_executor_point(base_model, 1.0, 1.0),
        ]
    })
}

/// Client for the routers API: CRUD, constrained runs, and training jobs.
///
/// Obtained from [`MartianClient::routers`](crate::MartianClient::routers).
#[derive(Clone)]
pub struct RoutersClient {
    transport: Arc<Transport>,
    cache: Arc<ResourceCache>,
    usage: Arc<UsageTracker>,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl RoutersClient {
    pub(crate) fn new(
        transport: Arc<Transport>,
        cache: Arc<ResourceCache>,
        usage: Arc<UsageTracker>,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            cache,
            usage,
            poll_interval,
            poll_timeout,
        }
    }

    /// Create a router under a caller-chosen id, routing only to `base_model`
    /// until trained.
    pub async fn create(
        &self,
        router_id: &str,
        base_model: &str,
        description: Option<&str>,
    ) -> Result<Router> {
        validate_resource_id(router_id)?;
        if self.exists(router_id).await? {
            return Err(ClientError::AlreadyExists(format!("routers/{router_id}")));
        }

        let spec = initial_router_spec(base_model);
        let payload = RouterPayload {
            router_spec: &spec,
            description,
        };
        let router: Router = self
            .transport
            .post_json("/routers", &[("routerId", router_id.to_string())], &payload)
            .await?;
        info!(router = %router.name, base_model, "created router");
        Ok(router)
    }

    /// Replace a router's spec and/or description.
    ///
    /// Updates are non-destructive: the returned router carries an
    /// incremented version, and previous versions stay readable via
    /// [`get`](Self::get).
    pub async fn update(
        &self,
        router_id: &str,
        router_spec: &JsonValue,
        description: Option<&str>,
    ) -> Result<Router> {
        let payload = RouterPayload {
            router_spec,
            description,
        };
        let router: Router = self
            .transport
            .patch_json(&format!("/routers/{router_id}"), &payload)
            .await?;
        info!(router = %router.name, version = router.version, "updated router");
        Ok(router)
    }

    /// List every router in the organization (latest versions).
    pub async fn list(&self) -> Result<Vec<Router>> {
        let response: ListRoutersResponse = self.transport.get_json("/routers", &[]).await?;
        Ok(response.routers)
    }

    /// Get a router, optionally pinned to a version.
    ///
    /// Pinned versions are immutable and served from the client cache when
    /// possible; the latest version is always fetched.
    pub async fn get(&self, router_id: &str, version: Option<u32>) -> Result<Router> {
        if let Some(version) = version {
            if let Some(router) = self.cache.get_router(router_id, version).await {
                debug!(router = router_id, version, "router served from cache");
                return Ok(router);
            }
        }

        let query: Vec<(&str, String)> = version
            .map(|v| ("version", v.to_string()))
            .into_iter()
            .collect();
        let router: Router = self
            .transport
            .get_json(&format!("/routers/{router_id}"), &query)
            .await?;

        if version.is_some() {
            self.cache.insert_router(router.clone()).await;
        }
        Ok(router)
    }

    /// Whether a router with this id exists.
    pub async fn exists(&self, router_id: &str) -> Result<bool> {
        match self
            .transport
            .get_json::<Router>(&format!("/routers/{router_id}"), &[])
            .await
        {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Run a completion through a router.
    ///
    /// Goes through the OpenAI-compatible gateway with the router's name as
    /// the model and the routing constraint merged into the request body. The
    /// response's `model` field reports which concrete model the router chose.
    pub async fn run(
        &self,
        router: &Router,
        constraint: &RoutingConstraint,
        completion_request: CompletionRequest,
    ) -> Result<ChatCompletion> {
        constraint.validate()?;

        let request = completion_request.with_model(router.name.clone());
        let body = RunBody {
            request: &request,
            routing_constraint: constraint,
        };
        let completion: ChatCompletion =
            self.transport.post_gateway("/chat/completions", &body).await?;
        self.usage.record_completion(&completion);
        debug!(router = %router.name, served_by = %completion.model, "router run complete");
        Ok(completion)
    }

    /// Start a training job: the router learns to route between `llms`,
    /// scored by `judge` over the sample `requests`.
    pub async fn run_training_job(
        &self,
        router: &Router,
        judge: &Judge,
        llms: &[String],
        requests: &[CompletionRequest],
    ) -> Result<RouterTrainingJob> {
        let body = TrainingJobBody {
            router_name: &router.name,
            judge_name: &judge.name,
            llms,
            requests,
        };
        let job: RouterTrainingJob = self
            .transport
            .post_json("/router_training_jobs", &[], &body)
            .await?;
        info!(
            job = %job.name,
            router = %router.name,
            judge = %judge.name,
            ?llms,
            "started training job"
        );
        Ok(job)
    }

    /// Fetch the current state of a training job. Accepts a full job name or
    /// a bare job id.
    pub async fn get_training_job(&self, job_name: &str) -> Result<RouterTrainingJob> {
        let job_id = id_from_name(job_name);
        self.transport
            .get_json(&format!("/router_training_jobs/{job_id}"), &[])
            .await
    }

    /// Poll a training job until it reaches a terminal status, using the
    /// configured poll interval and timeout.
    pub async fn wait_training_job(&self, job_name: &str) -> Result<RouterTrainingJob> {
        self.wait_training_job_with(job_name, self.poll_interval, self.poll_timeout)
            .await
    }

    /// Poll a training job with an explicit cadence.
    ///
    /// Returns the final job on SUCCESS / FAILURE / FAILURE_WITHOUT_RETRY, or
    /// [`ClientError::PollTimeout`] once `poll_timeout` elapses. The job keeps
    /// running server-side on timeout; polling can be resumed.
    pub async fn wait_training_job_with(
        &self,
        job_name: &str,
        poll_interval: Duration,
        poll_timeout: Duration,
    ) -> Result<RouterTrainingJob> {
        let job_id = id_from_name(job_name).to_string();
        let started = tokio::time::Instant::now();

        loop {
            let job = self.get_training_job(&job_id).await?;
            info!(
                job = %job_id,
                status = ?job.status,
                elapsed = ?started.elapsed(),
                "training job status"
            );

            if matches!(job.status, TrainingJobStatus::FailureWithoutRetry) {
                warn!(job = %job_id, "training job failed with all retry attempts exhausted");
            }
            if job.status.is_terminal() {
                return Ok(job);
            }

            if started.elapsed() + poll_interval > poll_timeout {
                return Err(ClientError::PollTimeout {
                    job: job_id,
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}
