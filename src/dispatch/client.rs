use super::{WorkerEndpoint, WorkerOutcome};
use crate::error::{DispatchError, WorkerCallError};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// One outbound call to one worker, classified into exactly one outcome.
///
/// Implementations make a single attempt and never fail: every transport or
/// decoding problem is folded into the returned [`WorkerOutcome`].
#[async_trait]
pub trait WorkerClient: Send + Sync {
    async fn call(&self, endpoint: &WorkerEndpoint, payload: &Value) -> WorkerOutcome;
}

/// POSTs the payload as JSON and reads the whole reply within `timeout`
pub struct HttpWorkerClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpWorkerClient {
    pub fn new(timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn classify_error(&self, err: reqwest::Error) -> WorkerCallError {
        if err.is_timeout() {
            WorkerCallError::Timeout(self.timeout)
        } else if err.is_connect() {
            WorkerCallError::Connect(error_chain(&err))
        } else if err.is_body() || err.is_decode() {
            WorkerCallError::Body(error_chain(&err))
        } else {
            WorkerCallError::Request(error_chain(&err))
        }
    }
}

#[async_trait]
impl WorkerClient for HttpWorkerClient {
    async fn call(&self, endpoint: &WorkerEndpoint, payload: &Value) -> WorkerOutcome {
        // The timeout covers connect through the end of the body
        let sent = self
            .client
            .post(endpoint.as_str())
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return transport_failure(self.classify_error(e)),
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => classify_body(status, body),
            Err(e) => transport_failure(self.classify_error(e)),
        }
    }
}

/// A reply counts as a success only when its body is a JSON object
pub fn classify_body(status_code: u16, body: String) -> WorkerOutcome {
    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(payload)) => WorkerOutcome::Success(payload),
        _ => WorkerOutcome::MalformedResponse {
            raw_body: body,
            status_code,
        },
    }
}

fn transport_failure(err: WorkerCallError) -> WorkerOutcome {
    WorkerOutcome::TransportFailure {
        message: err.to_string(),
    }
}

/// reqwest's top-level message hides the cause (refused, DNS, ...) in its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
