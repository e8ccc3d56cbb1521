use crate::dispatch::{AggregateResponse, Dispatcher, NormalizedResult};
use crate::output::render_summary;
use crate::publish::ReportPublisher;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Stand-in code when a review webhook arrives without any
pub const PLACEHOLDER_CODE: &str = "# No code provided from GitLab.";

#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
    publisher: Option<Arc<dyn ReportPublisher>>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, publisher: Option<Arc<dyn ReportPublisher>>) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            publisher,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GitlabReviewResponse {
    pub results: Vec<NormalizedResult>,
    /// Status of the publish write, 0 when no response was obtained
    pub gitlab_status: u16,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyse", post(analyse))
        .route("/task", post(analyse))
        .route("/gitlab_review", post(gitlab_review))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Forward the body verbatim to every worker
async fn analyse(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<AggregateResponse> {
    Json(state.dispatcher.dispatch(&payload).await)
}

async fn gitlab_review(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<GitlabReviewResponse> {
    let code = body
        .get("code")
        .cloned()
        .unwrap_or_else(|| Value::String(PLACEHOLDER_CODE.to_string()));

    let response = state.dispatcher.dispatch(&json!({ "code": code })).await;
    let summary = render_summary(&response);
    let gitlab_status = publish_summary(state.publisher.as_deref(), &summary).await;

    Json(GitlabReviewResponse {
        results: response.results,
        gitlab_status,
    })
}

/// Publish failures are logged and folded into the returned status
async fn publish_summary(publisher: Option<&dyn ReportPublisher>, summary: &str) -> u16 {
    let Some(publisher) = publisher else {
        warn!("GitLab publishing is not configured, skipping");
        return 0;
    };

    match publisher.publish(summary).await {
        Ok(receipt) => {
            info!("GitLab publish: {}: {}", receipt.status, receipt.body);
            receipt.status
        }
        Err(e) => {
            warn!("GitLab publish failed: {}", e);
            0
        }
    }
}
