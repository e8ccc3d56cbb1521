use super::{PublishReceipt, ReportPublisher};
use crate::config::GitlabConfig;
use crate::error::PublishError;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Upserts one file in a GitLab repository through the repository files API
pub struct GitLabPublisher {
    client: reqwest::Client,
    file_url: Url,
    token: String,
    branch: String,
    commit_message: String,
}

#[derive(Serialize)]
struct FileCommit<'a> {
    branch: &'a str,
    content: &'a str,
    commit_message: &'a str,
}

impl GitLabPublisher {
    /// Returns `Ok(None)` when project or token is missing
    pub fn from_config(config: &GitlabConfig) -> Result<Option<Self>, PublishError> {
        let client = reqwest::Client::builder().timeout(PUBLISH_TIMEOUT).build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(
        client: reqwest::Client,
        config: &GitlabConfig,
    ) -> Result<Option<Self>, PublishError> {
        let (Some(project), Some(token)) = (&config.project, &config.token) else {
            return Ok(None);
        };
        if !config.is_configured() {
            return Ok(None);
        }

        Ok(Some(Self {
            client,
            file_url: file_url(&config.api_url, project.trim(), &config.file_path)?,
            token: token.trim().to_string(),
            branch: config.branch.clone(),
            commit_message: config.commit_message.clone(),
        }))
    }

    async fn file_exists(&self) -> Result<bool, PublishError> {
        let response = self
            .client
            .get(self.file_url.clone())
            .query(&[("ref", self.branch.as_str())])
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        Ok(response.status() == StatusCode::OK)
    }
}

#[async_trait]
impl ReportPublisher for GitLabPublisher {
    async fn publish(&self, content: &str) -> Result<PublishReceipt, PublishError> {
        let exists = self.file_exists().await?;
        debug!(
            "GitLab file {} {} on {}",
            self.file_url,
            if exists { "exists" } else { "is new" },
            self.branch
        );

        let request = if exists {
            self.client.put(self.file_url.clone())
        } else {
            self.client.post(self.file_url.clone())
        };

        let response = request
            .header(TOKEN_HEADER, &self.token)
            .json(&FileCommit {
                branch: &self.branch,
                content,
                commit_message: &self.commit_message,
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(PublishReceipt { status, body })
    }
}

/// `{api}/projects/{project}/repository/files/{file}`, where project and file
/// are each one percent-encoded segment (`/` becomes `%2F`)
fn file_url(api_url: &str, project: &str, file_path: &str) -> Result<Url, PublishError> {
    let mut url = Url::parse(api_url).map_err(|_| PublishError::InvalidUrl(api_url.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| PublishError::InvalidUrl(api_url.to_string()))?
        .pop_if_empty()
        .extend(["projects", project, "repository", "files", file_path]);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{closed_addr, http_client, spawn_router};
    use axum::extract::{Path, Query, State};
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockGitLab {
        files: HashMap<String, String>,
        writes: Vec<(String, Value)>,
    }

    type Shared = Arc<Mutex<MockGitLab>>;

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) == Some("secret")
    }

    async fn read_file(
        State(state): State<Shared>,
        Path((project, file)): Path<(String, String)>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "401 Unauthorized"})));
        }
        let key = format!("{project}:{}:{file}", query.get("ref").cloned().unwrap_or_default());
        match state.lock().unwrap().files.get(&key) {
            Some(content) => (StatusCode::OK, Json(json!({"content": content}))),
            None => (StatusCode::NOT_FOUND, Json(json!({"message": "404 File Not Found"}))),
        }
    }

    async fn write_file(
        state: Shared,
        method: &str,
        project: String,
        file: String,
        headers: HeaderMap,
        body: Value,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "401 Unauthorized"})));
        }

        let mut state = state.lock().unwrap();
        let key = format!("{project}:{}:{file}", body["branch"].as_str().unwrap_or_default());
        let exists = state.files.contains_key(&key);
        state.writes.push((method.to_string(), body.clone()));

        match (method, exists) {
            ("POST", false) => {
                state.files.insert(key, body["content"].as_str().unwrap_or_default().into());
                (StatusCode::CREATED, Json(json!({"file_path": file})))
            }
            ("PUT", true) => {
                state.files.insert(key, body["content"].as_str().unwrap_or_default().into());
                (StatusCode::OK, Json(json!({"file_path": file})))
            }
            _ => (StatusCode::BAD_REQUEST, Json(json!({"message": "A file with this name already exists"}))),
        }
    }

    async fn create_file(
        State(state): State<Shared>,
        Path((project, file)): Path<(String, String)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        write_file(state, "POST", project, file, headers, body).await
    }

    async fn update_file(
        State(state): State<Shared>,
        Path((project, file)): Path<(String, String)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        write_file(state, "PUT", project, file, headers, body).await
    }

    async fn mock_gitlab() -> (std::net::SocketAddr, Shared) {
        let state: Shared = Arc::default();
        let router = Router::new()
            .route(
                "/api/v4/projects/{project}/repository/files/{file}",
                get(read_file).post(create_file).put(update_file),
            )
            .with_state(state.clone());
        (spawn_router(router).await, state)
    }

    fn gitlab_config(api_url: String) -> GitlabConfig {
        GitlabConfig {
            api_url,
            project: Some("group/project".into()),
            token: Some("secret".into()),
            ..GitlabConfig::default()
        }
    }

    #[test]
    fn test_file_url_encodes_segments() {
        let url = file_url(
            "https://gitlab.com/api/v4/",
            "group/sub/project",
            "ai_review/last_review.md",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitlab.com/api/v4/projects/group%2Fsub%2Fproject/repository/files/ai_review%2Flast_review.md"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        assert!(matches!(
            file_url("not a url", "p", "f"),
            Err(PublishError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_unconfigured_publisher_is_none() {
        let mut config = GitlabConfig::default();
        assert!(GitLabPublisher::with_client(http_client(), &config).unwrap().is_none());

        config.project = Some("group/project".into());
        config.token = Some("  ".into());
        assert!(GitLabPublisher::with_client(http_client(), &config).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_creates_then_updates() {
        let (addr, state) = mock_gitlab().await;
        let publisher = GitLabPublisher::with_client(
            http_client(),
            &gitlab_config(format!("http://{addr}/api/v4")),
        )
        .unwrap()
        .unwrap();

        let first = publisher.publish("### A\nx").await.unwrap();
        assert_eq!(first.status, 201);

        let second = publisher.publish("### A\ny").await.unwrap();
        assert_eq!(second.status, 200);
        assert!(second.body.contains("ai_review/last_review.md"));

        let state = state.lock().unwrap();
        let methods: Vec<_> = state.writes.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(methods, vec!["POST", "PUT"]);
        assert_eq!(
            state.writes[1].1,
            json!({
                "branch": "main",
                "content": "### A\ny",
                "commit_message": "Update AI review file via aggregator"
            })
        );
        assert_eq!(
            state.files.get("group/project:main:ai_review/last_review.md").map(String::as_str),
            Some("### A\ny")
        );
    }

    #[tokio::test]
    async fn test_rejected_write_is_reported_not_raised() {
        let (addr, state) = mock_gitlab().await;
        let mut config = gitlab_config(format!("http://{addr}/api/v4"));
        config.token = Some("wrong".into());
        let publisher = GitLabPublisher::with_client(http_client(), &config)
            .unwrap()
            .unwrap();

        let receipt = publisher.publish("body").await.unwrap();
        assert_eq!(receipt.status, 401);
        assert!(receipt.body.contains("Unauthorized"));
        assert!(state.lock().unwrap().writes.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_gitlab_is_error() {
        let addr = closed_addr().await;
        let publisher = GitLabPublisher::with_client(
            http_client(),
            &gitlab_config(format!("http://{addr}/api/v4")),
        )
        .unwrap()
        .unwrap();

        assert!(matches!(
            publisher.publish("body").await,
            Err(PublishError::Request(_))
        ));
    }
}
