pub mod dispatch;
pub mod schema;
pub mod serve;
pub mod worker;

use crate::config::{parse_worker_list, Config};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "whispernet")]
#[command(
    author,
    version,
    about = "Federated code review: fan one request out to many review workers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the aggregator HTTP service
    Serve(ServeArgs),

    /// Fan a code file out to the workers once and print the results
    Dispatch(DispatchArgs),

    /// Run the built-in static-check worker
    Worker(WorkerArgs),

    /// Print JSON Schema for config validation
    Schema,
}

/// Settings shared by every command that talks to workers
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Path to YAML config file
    #[arg(short, long, env = "WHISPERNET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Worker endpoint URLs, comma-separated, in result order
    #[arg(long, env = "WORKER_URLS")]
    pub workers: Option<String>,

    /// Per-worker timeout in seconds
    #[arg(long, env = "WORKER_TIMEOUT_SEC")]
    pub worker_timeout_sec: Option<u64>,

    /// Cap on concurrent worker calls per request
    #[arg(long, env = "MAX_IN_FLIGHT")]
    pub max_in_flight: Option<usize>,
}

impl ConfigArgs {
    /// Load the config file (if any) and apply CLI/env overrides on top
    pub fn load(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config from {:?}", path);
                Config::load(path)?
            }
            None => Config::default(),
        };

        if let Some(workers) = &self.workers {
            config.workers = parse_worker_list(workers);
        }
        if let Some(timeout) = self.worker_timeout_sec {
            config.worker_timeout_sec = timeout;
        }
        if let Some(limit) = self.max_in_flight {
            config.max_in_flight = Some(limit);
        }

        Ok(config)
    }
}

#[derive(Parser, Clone, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Listen address
    #[arg(long, env = "WHISPERNET_BIND")]
    pub bind: Option<String>,

    /// GitLab API base URL
    #[arg(long, env = "GITLAB_API_URL")]
    pub gitlab_api_url: Option<String>,

    /// GitLab project (owner/repo or numeric id) receiving the review file
    #[arg(long, env = "GITLAB_PROJECT")]
    pub gitlab_project: Option<String>,

    /// GitLab access token
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// Branch to commit the review file to
    #[arg(long, env = "GITLAB_BRANCH")]
    pub gitlab_branch: Option<String>,

    /// Repository path of the review file
    #[arg(long, env = "GITLAB_FILE")]
    pub gitlab_file: Option<String>,
}

#[derive(Parser, Clone, Debug)]
pub struct DispatchArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// File with the code to review (reads stdin when omitted)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Print the rendered Markdown summary instead of JSON
    #[arg(long)]
    pub summary: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct WorkerArgs {
    /// Listen address
    #[arg(long, env = "WORKER_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Identity reported in every review
    #[arg(long, env = "WORKER_ID", default_value = "rust-worker-01")]
    pub worker_id: String,
}
