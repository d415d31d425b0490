use crate::core::classifier::Classifier;
use crate::core::scoring::repository_novelty;
use crate::models::{FeatureVector, Project, Source};
use crate::services::provider::{Provider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

/// Public GitHub REST endpoint
pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

/// Maximum number of topics carried over as tags
const MAX_REPOSITORY_TAGS: usize = 5;

/// Search response envelope
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RepositoryItem>,
}

/// The subset of a repository document we read
#[derive(Debug, Deserialize)]
struct RepositoryItem {
    id: u64,
    name: String,
    html_url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    language: Option<String>,
}

/// Repository search provider
///
/// Queries the repository search endpoint sorted by stars and classifies
/// each hit through the injected difficulty model.
pub struct GithubProvider {
    base_url: String,
    token: Option<String>,
    client: Client,
    classifier: Arc<dyn Classifier>,
}

impl GithubProvider {
    pub fn new(
        base_url: String,
        token: Option<String>,
        client: Client,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            base_url,
            token: token.filter(|t| !t.is_empty()),
            client,
            classifier,
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<RepositoryItem>, ProviderError> {
        let url = format!("{}/search/repositories", self.base_url.trim_end_matches('/'));
        let per_page = limit.to_string();

        tracing::debug!("Searching repositories: {} (q={}, per_page={})", url, query, per_page);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ]);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError(response.status()));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse search results: {}", e)))?;

        Ok(parsed.items.into_iter().take(limit).collect())
    }
}

#[async_trait]
impl Provider for GithubProvider {
    fn source(&self) -> Source {
        Source::Repository
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Project>, ProviderError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut items = self.search(query, limit).await?;
        for item in items.iter_mut() {
            item.topics.truncate(MAX_REPOSITORY_TAGS);
        }

        let features: Vec<FeatureVector> = items.iter().map(feature_vector).collect();

        // Inference is CPU-bound, keep it off the async workers
        let classifier = Arc::clone(&self.classifier);
        let levels = tokio::task::spawn_blocking(move || {
            features
                .into_iter()
                .map(|f| classifier.predict(f))
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| ProviderError::ClassifierError(format!("spawn_blocking join: {}", e)))?;

        let projects: Vec<Project> = items
            .into_iter()
            .zip(levels)
            .map(|(item, level)| Project {
                id: item.id.to_string(),
                title: item.name,
                description: item
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| "No description".to_string()),
                source: Source::Repository,
                level,
                novelty_score: repository_novelty(item.stargazers_count),
                url: item.html_url,
                tags: item.topics,
                language: item.language,
                stars: Some(item.stargazers_count),
            })
            .collect();

        tracing::debug!("Repository search for '{}' produced {} projects", query, projects.len());

        Ok(projects)
    }
}

fn feature_vector(item: &RepositoryItem) -> FeatureVector {
    let description_length = item
        .description
        .as_deref()
        .map(|d| d.chars().count())
        .unwrap_or(0);

    FeatureVector {
        stars: item.stargazers_count,
        open_issues: item.open_issues_count,
        description_length: description_length as u64,
        tag_count: item.topics.len() as u64,
    }
}
