pub fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

pub fn default_worker_timeout_sec() -> u64 {
    30
}

pub fn default_gitlab_api_url() -> String {
    "https://gitlab.com/api/v4".to_string()
}

pub fn default_gitlab_branch() -> String {
    "main".to_string()
}

pub fn default_gitlab_file_path() -> String {
    "ai_review/last_review.md".to_string()
}

pub fn default_commit_message() -> String {
    "Update AI review file via aggregator".to_string()
}
