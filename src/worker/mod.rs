//! Reference worker: a static checker that speaks the worker contract.
//!
//! It flags TODO and FIXME markers and over-long lines, which is enough to
//! exercise an aggregator end to end without a model backend.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const MODEL: &str = "static-checker-rust-1.0";
const MAX_LINE_LEN: usize = 100;

#[derive(Debug, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub review: String,
    pub worker_id: String,
    pub model: String,
    pub issues: Vec<String>,
}

pub fn analyse_code(code: &str, worker_id: &str) -> Insight {
    let mut issues = Vec::new();

    for (idx, line) in code.lines().enumerate() {
        let line_no = idx + 1;
        if line.contains("TODO") {
            issues.push(format!("TODO in line {}", line_no));
        }
        if line.contains("FIXME") {
            issues.push(format!("FIXME in line {}", line_no));
        }
        let len = line.len();
        if len > MAX_LINE_LEN {
            issues.push(format!("Line {} is too long (>{} chars)", line_no, len));
        }
    }

    let review = if issues.is_empty() {
        "Rust worker checked code, no issues found.".to_string()
    } else {
        format!("Rust worker checked code, found {} issue(s).", issues.len())
    };

    Insight {
        review,
        worker_id: worker_id.to_string(),
        model: MODEL.to_string(),
        issues,
    }
}

pub fn router(worker_id: String) -> Router {
    Router::new()
        .route("/analyse", post(analyse))
        .route("/health", get(health))
        .with_state(Arc::<str>::from(worker_id))
}

async fn analyse(State(worker_id): State<Arc<str>>, Json(task): Json<Task>) -> Json<Insight> {
    let insight = analyse_code(&task.code, &worker_id);
    debug!(
        "Analysed {} bytes, {} issue(s)",
        task.code.len(),
        insight.issues.len()
    );
    Json(insight)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
