use crate::models::{Project, Source};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Per-call timeout applied to every provider
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Reasons a provider call contributed nothing
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error status: {0}")]
    ApiError(reqwest::StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Classifier worker failed: {0}")]
    ClassifierError(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

/// A source of project candidates
///
/// `fetch` returns at most `limit` normalized projects. Errors are returned
/// as values; the aggregator turns them into an empty contribution.
#[async_trait]
pub trait Provider: Send + Sync {
    fn source(&self) -> Source;

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Project>, ProviderError>;
}

/// Build the shared HTTP client used by the network providers
pub fn build_http_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, ProviderError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}
