use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Address the aggregator listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Worker endpoint URLs, in result order
    #[serde(default)]
    pub workers: Vec<String>,

    /// Per-worker call timeout
    #[serde(default = "default_worker_timeout_sec")]
    pub worker_timeout_sec: u64,

    /// Cap on concurrent worker calls per request (unbounded when unset)
    #[serde(default)]
    pub max_in_flight: Option<usize>,

    #[serde(default)]
    pub gitlab: GitlabConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GitlabConfig {
    #[serde(default = "default_gitlab_api_url")]
    pub api_url: String,

    /// Project path or numeric id, e.g. `group/project`
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_gitlab_branch")]
    pub branch: String,

    #[serde(default = "default_gitlab_file_path")]
    pub file_path: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for GitlabConfig {
    fn default() -> Self {
        Self {
            api_url: default_gitlab_api_url(),
            project: None,
            token: None,
            branch: default_gitlab_branch(),
            file_path: default_gitlab_file_path(),
            commit_message: default_commit_message(),
        }
    }
}

impl GitlabConfig {
    /// Publishing needs both a target project and a credential.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.project) && present(&self.token)
    }
}
