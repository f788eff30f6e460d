//! # martian-core
//!
//! Typed configuration and resource models for the Martian
//! LLM-evaluation-and-routing API.
//!
//! This crate holds the passive value objects the SDK marshals over the wire:
//! judge specifications, routing constraints, server-managed resources
//! (judges, routers, training jobs), and the OpenAI-compatible chat types used
//! by evaluation and router runs. Everything here is deterministic and
//! side-effect free; the HTTP plumbing lives in `martian-client`.
//!
//! ## Key Guarantees
//!
//! 1. **No I/O**: pure data types plus local validation
//! 2. **Wire-faithful**: serialization matches the API's JSON shapes exactly
//! 3. **Validated locally**: score bounds and constraint shapes are checked
//!    before a request ever leaves the process
//!
//! ## Example
//!
//! ```rust
//! use martian_core::{JudgeSpec, RubricJudgeSpec};
//!
//! let spec = JudgeSpec::rubric(
//!     RubricJudgeSpec::new(
//!         "Score the response 1-5 on helpfulness.",
//!         "openai/openai/gpt-4o",
//!         1.0,
//!         5.0,
//!     ),
//! );
//! assert!(spec.validate().is_ok());
//! assert_eq!(spec.score_range().unwrap(), (1.0, 5.0));
//! ```

pub mod balance;
pub mod chat;
pub mod constraint;
pub mod evaluation;
pub mod id;
pub mod judge_spec;
pub mod models;
pub mod resource;
pub mod training;

// Re-export main types at crate root
pub use balance::OrganizationBalance;
pub use chat::{ChatCompletion, ChatMessage, Choice, CompletionRequest, CompletionUsage};
pub use constraint::{
    ConstraintError, ConstraintValue, CostConstraint, QualityConstraint, RoutingConstraint,
};
pub use evaluation::JudgeEvaluation;
pub use id::{validate_resource_id, IdError};
pub use judge_spec::{
    AggregateJudgeSpec, AverageScoreJudgeSpec, CaseJudgeSpec, ConstantJudgeSpec,
    ExactMatchJudgeSpec, GoldMatchJudgeSpec, JudgeCase, JudgeSpec, RubricJudgeSpec, SpecError,
};
pub use resource::{id_from_name, Judge, Router};
pub use training::{RouterTrainingJob, TrainingJobStatus};
