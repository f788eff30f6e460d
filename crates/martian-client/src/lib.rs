//! # martian-client
//!
//! Async client SDK for the Martian LLM-evaluation-and-routing API.
//!
//! Martian hosts two kinds of resources: **judges** (evaluators that score
//! LLM responses against a spec, e.g. a rubric) and **routers** (model
//! selectors that, once trained, pick a backend per request along a
//! cost/quality frontier). This crate wraps the HTTP contract: judge and
//! router CRUD, judge evaluation, constrained router runs, and training-job
//! submission with a polling loop.
//!
//! The hard work of training and routing optimization happens entirely
//! server-side. The SDK marshals typed requests and responses, nothing more.
//!
//! ## Example
//!
//! ```rust,no_run
//! use martian_client::{ClientConfig, MartianClient};
//! use martian_core::{JudgeSpec, RubricJudgeSpec};
//!
//! # async fn demo() -> martian_client::Result<()> {
//! let client = MartianClient::from_env()?;
//!
//! let spec = JudgeSpec::rubric(RubricJudgeSpec::new(
//!     "Score the restaurant recommendation from 1 (useless) to 5 (perfect).",
//!     "openai/openai/gpt-4o",
//!     1.0,
//!     5.0,
//! ));
//! let judge = client
//!     .judges()
//!     .create("restaurant-judge", &spec, Some("Recommendation quality"))
//!     .await?;
//! println!("created {} v{}", judge.id(), judge.version);
//! # Ok(())
//! # }
//! ```

mod cache;
mod client;
mod config;
mod credential;
mod error;
mod http;
mod judges;
mod organization;
mod routers;
mod usage;

pub use client::MartianClient;
pub use config::{
    ClientConfig, API_KEY_ENV, API_URL_ENV, EVALUATION_TIMEOUT_ENV, GATEWAY_URL_ENV, ORG_ID_ENV,
};
pub use credential::{ApiCredential, CredentialSource};
pub use error::{ClientError, Result};
pub use judges::JudgesClient;
pub use organization::OrganizationClient;
pub use routers::RoutersClient;
pub use usage::UsageReport;

// The model and spec types callers hold alongside the client.
pub use martian_core::{
    ChatCompletion, ChatMessage, CompletionRequest, ConstraintValue, Judge, JudgeEvaluation,
    JudgeSpec, OrganizationBalance, Router, RouterTrainingJob, RoutingConstraint,
    TrainingJobStatus,
};
