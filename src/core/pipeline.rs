use crate::core::aggregator::Aggregator;
use crate::core::filters::{LevelFilter, SourceFilter};
use crate::core::ranker::{RankResult, Ranker, RECOMMENDATION_CAP, SEARCH_CAP};
use crate::models::ProviderLimits;

/// Limits and caps for the two entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineLimits {
    pub search: ProviderLimits,
    pub search_cap: usize,
    pub recommendation: ProviderLimits,
    pub recommendation_cap: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            search: ProviderLimits::search(),
            search_cap: SEARCH_CAP,
            recommendation: ProviderLimits::recommendation(),
            recommendation_cap: RECOMMENDATION_CAP,
        }
    }
}

/// Aggregate then rank
#[derive(Clone)]
pub struct Pipeline {
    aggregator: Aggregator,
    ranker: Ranker,
    limits: PipelineLimits,
}

impl Pipeline {
    pub fn new(aggregator: Aggregator, limits: PipelineLimits) -> Self {
        Self {
            aggregator,
            ranker: Ranker::new(),
            limits,
        }
    }

    pub fn limits(&self) -> &PipelineLimits {
        &self.limits
    }

    /// Ad hoc search over the selected sources
    pub async fn search(&self, query: &str, source: SourceFilter, level: LevelFilter) -> RankResult {
        let aggregation = self.aggregator.collect(query, source, self.limits.search).await;

        tracing::info!(
            "Search '{}' collected {} candidates ({} providers failed)",
            query,
            aggregation.projects.len(),
            aggregation.failures.len()
        );

        self.ranker
            .rank(aggregation.projects, level, self.limits.search_cap)
    }

    /// Recommendation round: every source, no level filter
    pub async fn recommend(&self, query: &str) -> RankResult {
        let aggregation = self
            .aggregator
            .collect(query, SourceFilter::All, self.limits.recommendation)
            .await;

        tracing::info!(
            "Recommendation query '{}' collected {} candidates ({} providers failed)",
            query,
            aggregation.projects.len(),
            aggregation.failures.len()
        );

        self.ranker.rank(
            aggregation.projects,
            LevelFilter::All,
            self.limits.recommendation_cap,
        )
    }
}
