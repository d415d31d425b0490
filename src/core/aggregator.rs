use crate::core::filters::SourceFilter;
use crate::models::{Project, ProviderLimits, Source};
use crate::services::provider::{Provider, ProviderError, DEFAULT_PROVIDER_TIMEOUT};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;

/// A provider call that contributed nothing
#[derive(Debug)]
pub struct ProviderFailure {
    pub source: Source,
    pub reason: ProviderError,
}

/// Merged output of one fan-out round
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Provider outputs concatenated in provider registration order
    pub projects: Vec<Project>,
    pub failures: Vec<ProviderFailure>,
}

/// Aborts the provider tasks of a fan-out round when the round is dropped
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Concurrent fan-out over the registered providers
///
/// Every selected provider runs in its own task under a per-call timeout.
/// A failed, timed-out or panicked provider contributes no items and never
/// affects its siblings. Panic isolation relies on the unwinding panic
/// strategy, so the release profile must not set `panic = "abort"`.
///
/// Dropping the `collect` future (for instance when the client disconnects)
/// aborts the provider tasks still in flight.
#[derive(Clone)]
pub struct Aggregator {
    providers: Vec<Arc<dyn Provider>>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self::with_timeout(providers, DEFAULT_PROVIDER_TIMEOUT)
    }

    pub fn with_timeout(providers: Vec<Arc<dyn Provider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Query every provider selected by `filter` and wait for all of them to settle
    pub async fn collect(&self, query: &str, filter: SourceFilter, limits: ProviderLimits) -> Aggregation {
        let handles: Vec<_> = self
            .providers
            .iter()
            .filter(|p| filter.selects(p.source()))
            .map(|provider| {
                let provider = Arc::clone(provider);
                let source = provider.source();
                let query = query.to_string();
                let limit = limits.for_source(source);
                let timeout = self.timeout;

                let handle = tokio::spawn(async move {
                    match tokio::time::timeout(timeout, provider.fetch(&query, limit)).await {
                        Ok(result) => result.map(|mut items| {
                            items.truncate(limit);
                            items
                        }),
                        Err(_) => Err(ProviderError::Timeout(timeout)),
                    }
                });

                (source, handle)
            })
            .collect();

        let _guard = AbortOnDrop(handles.iter().map(|(_, h)| h.abort_handle()).collect());
        let mut aggregation = Aggregation::default();

        // Awaiting in spawn order keeps the merged output in provider order
        for (source, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Err(ProviderError::InvalidResponse(format!("provider task failed: {}", e))),
            };

            match outcome {
                Ok(items) => {
                    tracing::debug!("Provider {} returned {} items for '{}'", source, items.len(), query);
                    aggregation.projects.extend(items);
                }
                Err(reason) => {
                    tracing::warn!("Provider {} failed for '{}': {}", source, query, reason);
                    aggregation.failures.push(ProviderFailure { source, reason });
                }
            }
        }

        aggregation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Level;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StaticProvider {
        source: Source,
        count: usize,
    }

    #[async_trait]
    impl Provider for StaticProvider {
        fn source(&self) -> Source {
            self.source
        }

        async fn fetch(&self, query: &str, _limit: usize) -> Result<Vec<Project>, ProviderError> {
            Ok((0..self.count)
                .map(|i| Project {
                    id: format!("{}-{}", self.source, i),
                    title: format!("{} {}", query, i),
                    description: String::new(),
                    source: self.source,
                    level: Level::Easy,
                    novelty_score: 5.0,
                    url: "https://example.com".to_string(),
                    tags: vec![],
                    language: None,
                    stars: None,
                })
                .collect())
        }
    }

    struct HangingProvider;

    #[async_trait]
    impl Provider for HangingProvider {
        fn source(&self) -> Source {
            Source::Paper
        }

        async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<Project>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }
    }

    struct PanickingProvider;

    #[async_trait]
    impl Provider for PanickingProvider {
        fn source(&self) -> Source {
            Source::Dataset
        }

        async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<Project>, ProviderError> {
            panic!("provider bug");
        }
    }

    /// Flags completion after a delay
    struct DelayedProvider {
        delay: Duration,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Provider for DelayedProvider {
        fn source(&self) -> Source {
            Source::Repository
        }

        async fn fetch(&self, _query: &str, _limit: usize) -> Result<Vec<Project>, ProviderError> {
            tokio::time::sleep(self.delay).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_collect_preserves_provider_order() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(StaticProvider { source: Source::Repository, count: 2 }),
            Arc::new(StaticProvider { source: Source::Paper, count: 1 }),
            Arc::new(StaticProvider { source: Source::Dataset, count: 3 }),
        ];
        let aggregator = Aggregator::new(providers);

        let result = aggregator
            .collect("rust", SourceFilter::All, ProviderLimits::search())
            .await;

        let ids: Vec<&str> = result.projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["repository-0", "repository-1", "paper-0", "dataset-0", "dataset-1", "dataset-2"]
        );
        assert!(result.failures.is_empty());
    }

    #[tokio::test]
    async fn test_collect_applies_source_filter_and_limits() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(StaticProvider { source: Source::Repository, count: 20 }),
            Arc::new(StaticProvider { source: Source::Dataset, count: 3 }),
        ];
        let aggregator = Aggregator::new(providers);

        let limits = ProviderLimits { repository: 4, paper: 4, dataset: 2 };
        let result = aggregator
            .collect("rust", SourceFilter::Only(Source::Repository), limits)
            .await;

        assert_eq!(result.projects.len(), 4);
        assert!(result.projects.iter().all(|p| p.source == Source::Repository));
    }

    #[tokio::test]
    async fn test_timeout_and_panic_are_isolated() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(StaticProvider { source: Source::Repository, count: 2 }),
            Arc::new(HangingProvider),
            Arc::new(PanickingProvider),
        ];
        let aggregator = Aggregator::with_timeout(providers, Duration::from_millis(50));

        let result = aggregator
            .collect("rust", SourceFilter::All, ProviderLimits::search())
            .await;

        assert_eq!(result.projects.len(), 2);
        assert_eq!(result.failures.len(), 2);
        assert!(matches!(
            result.failures[0],
            ProviderFailure { source: Source::Paper, reason: ProviderError::Timeout(_) }
        ));
        assert_eq!(result.failures[1].source, Source::Dataset);
    }

    #[tokio::test]
    async fn test_dropped_collect_aborts_provider_tasks() {
        let finished = Arc::new(AtomicBool::new(false));
        let providers: Vec<Arc<dyn Provider>> = vec![Arc::new(DelayedProvider {
            delay: Duration::from_millis(100),
            finished: Arc::clone(&finished),
        })];
        let aggregator = Aggregator::with_timeout(providers, Duration::from_secs(5));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            aggregator.collect("rust", SourceFilter::All, ProviderLimits::search()),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_release_profile_unwinds_on_panic() {
        let manifest = include_str!("../../Cargo.toml");
        let release = manifest
            .split("[profile.release]")
            .nth(1)
            .unwrap_or_default();
        let release = release.split("\n[").next().unwrap_or_default();

        assert!(!release.contains("panic"), "provider panics must unwind");
    }
}
