use super::{WorkerEndpoint, WorkerOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Keys with a meaning to the aggregator. Everything else passes through untouched.
#[allow(dead_code)]
pub mod fields {
    pub const WORKER_ID: &str = "worker_id";
    pub const WORKER_URL: &str = "worker_url";
    pub const MODEL: &str = "model";
    pub const REVIEW: &str = "review";
    pub const ISSUES: &str = "issues";
    pub const ERROR: &str = "error";
    pub const STATUS_CODE: &str = "status_code";
    pub const TEXT: &str = "text";
}

pub const INVALID_JSON_ERROR: &str = "Invalid JSON response";

/// Uniform per-worker record returned to callers.
///
/// Backed by an insertion-ordered JSON object so unknown worker keys survive
/// verbatim and serialize in the order the worker sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedResult(Map<String, Value>);

impl NormalizedResult {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Text form of a field, skipping null and empty strings
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }

    #[allow(dead_code)]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for NormalizedResult {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Map one raw outcome into its uniform record. Total: every outcome has a result.
pub fn normalize(endpoint: &WorkerEndpoint, outcome: WorkerOutcome) -> NormalizedResult {
    let map = match outcome {
        WorkerOutcome::Success(payload) if payload.contains_key(fields::WORKER_ID) => payload,
        WorkerOutcome::Success(mut payload) => {
            payload.insert(fields::WORKER_URL.into(), endpoint.as_str().into());
            payload
        }
        WorkerOutcome::MalformedResponse {
            raw_body,
            status_code,
        } => {
            let mut map = Map::new();
            map.insert(fields::ERROR.into(), INVALID_JSON_ERROR.into());
            map.insert(fields::WORKER_URL.into(), endpoint.as_str().into());
            map.insert(fields::STATUS_CODE.into(), status_code.into());
            map.insert(fields::TEXT.into(), raw_body.into());
            map
        }
        WorkerOutcome::TransportFailure { message } => {
            let mut map = Map::new();
            map.insert(fields::WORKER_URL.into(), endpoint.as_str().into());
            map.insert(fields::ERROR.into(), message.into());
            map
        }
    };

    NormalizedResult(map)
}
