mod client;
mod coordinator;
mod normalize;

#[cfg(test)]
pub use client::HttpWorkerClient;
pub use coordinator::Dispatcher;
pub use normalize::{fields, NormalizedResult};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Address of one worker. Order within the configured list defines result order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerEndpoint(String);

impl WorkerEndpoint {
    /// Returns `None` for blank entries, which configuration silently skips
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw classified result of one dispatch attempt, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerOutcome {
    /// Worker replied with a JSON object
    Success(Map<String, Value>),
    /// Worker replied, but not with a JSON object
    MalformedResponse { raw_body: String, status_code: u16 },
    /// No response at all (refused, timed out, DNS, TLS, ...)
    TransportFailure { message: String },
}

/// Combined reply: one entry per configured endpoint, in configured order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResponse {
    pub results: Vec<NormalizedResult>,
}

impl AggregateResponse {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
