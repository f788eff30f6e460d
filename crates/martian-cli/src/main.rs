//! `martian` - command-line access to the Martian API.
//!
//! Reads connection settings from the `MARTIAN_API_URL`, `MARTIAN_ORG_ID` and
//! `MARTIAN_API_KEY` environment variables. Resources are printed as pretty
//! JSON so the output composes with `jq`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use martian_client::{ClientConfig, MartianClient};
use martian_core::{
    ChatCompletion, ChatMessage, Choice, CompletionRequest, ConstraintValue, JudgeSpec,
    RoutingConstraint,
};

#[derive(Parser)]
#[command(name = "martian", version, about = "Martian judges and routers from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage and evaluate judges.
    Judges {
        #[command(subcommand)]
        command: JudgesCommand,
    },

    /// Manage, train and run routers.
    Routers {
        #[command(subcommand)]
        command: RoutersCommand,
    },

    /// Show the organization's credit balance.
    Balance,
}

#[derive(Subcommand)]
enum JudgesCommand {
    /// List all judges.
    List,

    /// Get a judge by id, optionally at a pinned version.
    Get {
        judge_id: String,
        #[arg(long)]
        version: Option<u32>,
    },

    /// Create a judge from a spec file (YAML or JSON).
    Create {
        judge_id: String,
        #[arg(long)]
        spec_file: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },

    /// Update a judge from a spec file, producing a new version.
    Update {
        judge_id: String,
        #[arg(long)]
        spec_file: PathBuf,
        #[arg(long)]
        description: Option<String>,
    },

    /// Evaluate a prompt/response pair against a spec file without saving it.
    Evaluate {
        #[arg(long)]
        spec_file: PathBuf,
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        response: String,
    },
}

#[derive(Subcommand)]
enum RoutersCommand {
    /// List all routers.
    List,

    /// Get a router by id, optionally at a pinned version.
    Get {
        router_id: String,
        #[arg(long)]
        version: Option<u32>,
    },

    /// Create a router that initially routes to a single base model.
    Create {
        router_id: String,
        #[arg(long)]
        base_model: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Train a router to route between models, scored by a judge.
    Train {
        router_id: String,
        #[arg(long)]
        judge: String,
        /// Model to train on (repeatable).
        #[arg(long = "llm", required = true)]
        llms: Vec<String>,
        /// Sample prompt for training (repeatable).
        #[arg(long = "prompt", required = true)]
        prompts: Vec<String>,
        /// Block until the job reaches a terminal status.
        #[arg(long)]
        wait: bool,
    },

    /// Show a training job's current state.
    Job { job_name: String },

    /// Run a prompt through a router under a cost/quality constraint.
    Run {
        router_id: String,
        #[arg(long)]
        prompt: String,
        /// Maximum cost in USD.
        #[arg(long, conflicts_with = "cost_model")]
        max_cost: Option<f64>,
        /// Mirror the cost of this model.
        #[arg(long)]
        cost_model: Option<String>,
        /// Minimum quality in [0, 1].
        #[arg(long, conflicts_with = "quality_model")]
        min_quality: Option<f64>,
        /// Mirror the quality of this model.
        #[arg(long)]
        quality_model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = MartianClient::new(ClientConfig::from_env()?)?;

    match cli.command {
        Command::Judges { command } => run_judges(&client, command).await,
        Command::Routers { command } => run_routers(&client, command).await,
        Command::Balance => {
            let balance = client.organization().credit_balance().await?;
            print_json(&balance)
        }
    }
}

async fn run_judges(client: &MartianClient, command: JudgesCommand) -> Result<()> {
    let judges = client.judges();
    match command {
        JudgesCommand::List => print_json(&judges.list().await?),
        JudgesCommand::Get { judge_id, version } => {
            print_json(&judges.get(&judge_id, version).await?)
        }
        JudgesCommand::Create {
            judge_id,
            spec_file,
            description,
        } => {
            let spec = load_spec(&spec_file)?;
            let judge = judges
                .create(&judge_id, &spec, description.as_deref())
                .await?;
            print_json(&judge)
        }
        JudgesCommand::Update {
            judge_id,
            spec_file,
            description,
        } => {
            let spec = load_spec(&spec_file)?;
            let judge = judges
                .update(&judge_id, &spec, description.as_deref())
                .await?;
            print_json(&judge)
        }
        JudgesCommand::Evaluate {
            spec_file,
            prompt,
            response,
        } => {
            let spec = load_spec(&spec_file)?;
            let evaluation = judges
                .evaluate_spec(
                    &spec,
                    &CompletionRequest::user(prompt),
                    &assistant_completion(response),
                )
                .await?;
            print_json(&evaluation)
        }
    }
}

async fn run_routers(client: &MartianClient, command: RoutersCommand) -> Result<()> {
    let routers = client.routers();
    match command {
        RoutersCommand::List => print_json(&routers.list().await?),
        RoutersCommand::Get { router_id, version } => {
            print_json(&routers.get(&router_id, version).await?)
        }
        RoutersCommand::Create {
            router_id,
            base_model,
            description,
        } => {
            let router = routers
                .create(&router_id, &base_model, description.as_deref())
                .await?;
            print_json(&router)
        }
        RoutersCommand::Train {
            router_id,
            judge,
            llms,
            prompts,
            wait,
        } => {
            let router = routers.get(&router_id, None).await?;
            let judge = client.judges().get(&judge, None).await?;
            let requests: Vec<CompletionRequest> =
                prompts.into_iter().map(CompletionRequest::user).collect();

            let job = routers
                .run_training_job(&router, &judge, &llms, &requests)
                .await?;
            if wait {
                let finished = routers.wait_training_job(&job.name).await?;
                print_json(&finished)
            } else {
                print_json(&job)
            }
        }
        RoutersCommand::Job { job_name } => {
            print_json(&routers.get_training_job(&job_name).await?)
        }
        RoutersCommand::Run {
            router_id,
            prompt,
            max_cost,
            cost_model,
            min_quality,
            quality_model,
        } => {
            let constraint =
                build_constraint(max_cost, cost_model, min_quality, quality_model)?;
            let router = routers.get(&router_id, None).await?;
            let completion = routers
                .run(&router, &constraint, CompletionRequest::user(prompt))
                .await?;
            print_json(&completion)
        }
    }
}

/// Assemble a routing constraint from the CLI flags.
fn build_constraint(
    max_cost: Option<f64>,
    cost_model: Option<String>,
    min_quality: Option<f64>,
    quality_model: Option<String>,
) -> Result<RoutingConstraint> {
    let cost = max_cost
        .map(ConstraintValue::numeric)
        .or(cost_model.map(ConstraintValue::model));
    let quality = min_quality
        .map(ConstraintValue::numeric)
        .or(quality_model.map(ConstraintValue::model));

    let constraint = match (cost, quality) {
        (Some(cost), Some(quality)) => RoutingConstraint::cost(cost).with_quality(quality),
        (Some(cost), None) => RoutingConstraint::cost(cost),
        (None, Some(quality)) => RoutingConstraint::quality(quality),
        (None, None) => bail!(
            "set at least one constraint: --max-cost, --cost-model, --min-quality or --quality-model"
        ),
    };
    constraint.validate()?;
    Ok(constraint)
}

/// Parse a judge spec from a YAML or JSON file.
fn load_spec(path: &Path) -> Result<JudgeSpec> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read spec file {}", path.display()))?;

    let spec: JudgeSpec = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&contents)
            .with_context(|| format!("invalid JSON judge spec in {}", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("invalid YAML judge spec in {}", path.display()))?
    };

    spec.validate()?;
    Ok(spec)
}

/// Wrap a response string the way the evaluation endpoint expects it: a
/// single-choice chat completion.
fn assistant_completion(content: String) -> ChatCompletion {
    ChatCompletion {
        id: String::new(),
        model: String::new(),
        created: 0,
        choices: vec![Choice {
            index: 0,
            finish_reason: Some("stop".to_string()),
            message: ChatMessage::assistant(content),
        }],
        usage: None,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
