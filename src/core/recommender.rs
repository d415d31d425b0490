use crate::core::pipeline::Pipeline;
use crate::models::{Project, UserProfile};
use crate::services::profiles::{ProfileStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

/// Query used when a profile lists no skills or interests
pub const DEFAULT_RECOMMENDATION_QUERY: &str = "programming";

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Profile store error: {0}")]
    Store(#[from] StoreError),
}

/// Build the search query for a profile
///
/// Skills then interests, joined by single spaces, in profile order.
pub fn profile_query(profile: &UserProfile) -> String {
    let query = profile
        .skills
        .iter()
        .chain(profile.area_of_interest.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    if query.trim().is_empty() {
        DEFAULT_RECOMMENDATION_QUERY.to_string()
    } else {
        query
    }
}

/// Drives the pipeline from a stored profile
#[derive(Clone)]
pub struct Recommender {
    store: Arc<dyn ProfileStore>,
    pipeline: Pipeline,
}

impl Recommender {
    pub fn new(store: Arc<dyn ProfileStore>, pipeline: Pipeline) -> Self {
        Self { store, pipeline }
    }

    pub async fn recommend(&self, email: &str) -> Result<Vec<Project>, RecommendError> {
        let profile = self
            .store
            .get(email)
            .await?
            .ok_or_else(|| RecommendError::NotFound(email.to_string()))?;

        let query = profile_query(&profile);
        tracing::debug!("Recommendation query for {}: '{}'", email, query);

        Ok(self.pipeline.recommend(&query).await.projects)
    }
}
