mod gitlab;

pub use gitlab::GitLabPublisher;

use crate::error::PublishError;
use async_trait::async_trait;

/// Status and body of the write call that stored the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub status: u16,
    pub body: String,
}

/// Stores a rendered review summary somewhere outside the aggregator.
///
/// Publishing is an upsert: the document is created when absent and
/// overwritten otherwise.
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    async fn publish(&self, content: &str) -> Result<PublishReceipt, PublishError>;
}
