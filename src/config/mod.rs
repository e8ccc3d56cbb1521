mod defaults;
mod types;

pub use types::*;

use crate::dispatch::WorkerEndpoint;
use crate::error::ConfigError;
use defaults::*;
use std::path::Path;
use std::time::Duration;

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            workers: Vec::new(),
            worker_timeout_sec: default_worker_timeout_sec(),
            max_in_flight: None,
            gitlab: GitlabConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        // An empty document deserializes to null, which serde_yaml rejects for a struct
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_timeout_sec == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_in_flight == Some(0) {
            return Err(ConfigError::ZeroInFlight);
        }
        Ok(())
    }

    /// Configured worker endpoints in order, blank entries dropped
    pub fn worker_endpoints(&self) -> Vec<WorkerEndpoint> {
        self.workers
            .iter()
            .filter_map(|url| WorkerEndpoint::parse(url))
            .collect()
    }

    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.worker_timeout_sec)
    }
}

/// Split a comma-separated worker list, as supplied through `WORKER_URLS`
pub fn parse_worker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
