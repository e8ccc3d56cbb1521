use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("worker_timeout_sec must be greater than zero")]
    ZeroTimeout,

    #[error("max_in_flight must be greater than zero when set")]
    ZeroInFlight,
}

/// Why a single worker call never produced a response body.
#[derive(Error, Debug)]
pub enum WorkerCallError {
    #[error("Worker timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to connect to worker: {0}")]
    Connect(String),

    #[error("Request to worker failed: {0}")]
    Request(String),

    #[error("Failed to read worker response body: {0}")]
    Body(String),
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid GitLab API URL '{0}'")]
    InvalidUrl(String),

    #[error("GitLab request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}
