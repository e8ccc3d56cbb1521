use super::client::{HttpWorkerClient, WorkerClient};
use super::normalize::normalize;
use super::{AggregateResponse, WorkerEndpoint, WorkerOutcome};
use crate::config::Config;
use crate::error::DispatchError;
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Fans one payload out to every configured worker and gathers one result each.
pub struct Dispatcher {
    endpoints: Vec<WorkerEndpoint>,
    client: Arc<dyn WorkerClient>,
    max_in_flight: Option<usize>,
}

impl Dispatcher {
    pub fn new(endpoints: Vec<WorkerEndpoint>, client: Arc<dyn WorkerClient>) -> Self {
        Self {
            endpoints,
            client,
            max_in_flight: None,
        }
    }

    /// Bound concurrent calls within one dispatch. `None` keeps fan-out unbounded.
    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.max_in_flight = limit;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, DispatchError> {
        let client = HttpWorkerClient::new(config.worker_timeout())?;
        Ok(Self::new(config.worker_endpoints(), Arc::new(client))
            .with_max_in_flight(config.max_in_flight))
    }

    pub fn endpoints(&self) -> &[WorkerEndpoint] {
        &self.endpoints
    }

    /// Call every worker concurrently and wait for all of them to settle.
    ///
    /// The result has exactly one entry per endpoint, in configured order,
    /// whatever order the workers finish in.
    pub async fn dispatch(&self, payload: &Value) -> AggregateResponse {
        let span = info_span!("dispatch", id = %Uuid::new_v4(), workers = self.endpoints.len());

        async move {
            if self.endpoints.is_empty() {
                debug!("No workers configured");
                return AggregateResponse::default();
            }

            let limiter = self.max_in_flight.map(Semaphore::new);
            let limiter = limiter.as_ref();

            let mut pending: FuturesUnordered<_> = self
                .endpoints
                .iter()
                .enumerate()
                .map(move |(idx, endpoint)| async move {
                    // Held until this call settles; acquire only fails on a closed semaphore
                    let _permit = match limiter {
                        Some(semaphore) => semaphore.acquire().await.ok(),
                        None => None,
                    };

                    let outcome = self.client.call(endpoint, payload).await;
                    log_outcome(endpoint, &outcome);
                    (idx, normalize(endpoint, outcome))
                })
                .collect();

            let mut settled = Vec::with_capacity(self.endpoints.len());
            while let Some(entry) = pending.next().await {
                settled.push(entry);
            }
            settled.sort_by_key(|(idx, _)| *idx);

            let response = AggregateResponse {
                results: settled.into_iter().map(|(_, result)| result).collect(),
            };
            info!("Collected {} worker results", response.len());
            response
        }
        .instrument(span)
        .await
    }
}

fn log_outcome(endpoint: &WorkerEndpoint, outcome: &WorkerOutcome) {
    match outcome {
        WorkerOutcome::Success(_) => debug!("Worker {} replied", endpoint),
        WorkerOutcome::MalformedResponse { status_code, .. } => {
            warn!(
                "Worker {} sent a non-JSON reply (status {})",
                endpoint, status_code
            )
        }
        WorkerOutcome::TransportFailure { message } => {
            warn!("Worker {} failed: {}", endpoint, message)
        }
    }
}
