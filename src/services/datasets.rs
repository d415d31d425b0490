use crate::models::{Level, Project, Source};
use crate::services::provider::{Provider, ProviderError};
use async_trait::async_trait;

/// A catalog template, parameterized by the query at fetch time
struct DatasetTemplate {
    title_suffix: &'static str,
    description: &'static str,
    tag: &'static str,
    slug: &'static str,
    level: Level,
    novelty_score: f64,
}

/// Fixed catalog, one archetype per difficulty level
const CATALOG: [DatasetTemplate; 3] = [
    DatasetTemplate {
        title_suffix: "Dataset Pack",
        description: "High-quality dataset for {} analysis.",
        tag: "dataset",
        slug: "pack",
        level: Level::Easy,
        novelty_score: 6.2,
    },
    DatasetTemplate {
        title_suffix: "Time Series Data",
        description: "Cleaned and preprocessed time series data for {}.",
        tag: "time-series",
        slug: "time-series",
        level: Level::Intermediate,
        novelty_score: 7.5,
    },
    DatasetTemplate {
        title_suffix: "Benchmark",
        description: "Evaluation benchmark with held-out splits for {} models.",
        tag: "benchmark",
        slug: "benchmark",
        level: Level::Advanced,
        novelty_score: 8.7,
    },
];

/// Dataset provider generating a templated catalog without network access
#[derive(Debug, Clone)]
pub struct DatasetProvider {
    base_url: String,
}

impl DatasetProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Materialize the catalog for a query
    pub fn catalog(&self, query: &str, limit: usize) -> Vec<Project> {
        let query = query.trim();
        let display = title_case(query);
        let tag = query.to_lowercase();
        let encoded = urlencoding::encode(&tag);

        CATALOG
            .iter()
            .take(limit)
            .map(|template| Project {
                id: uuid::Uuid::new_v4().to_string(),
                title: format!("{} {}", display, template.title_suffix),
                description: template.description.replace("{}", query),
                source: Source::Dataset,
                level: template.level,
                novelty_score: template.novelty_score,
                url: format!(
                    "{}/datasets/{}/{}",
                    self.base_url.trim_end_matches('/'),
                    encoded,
                    template.slug
                ),
                tags: vec![template.tag.to_string(), tag.clone()],
                language: None,
                stars: None,
            })
            .collect()
    }
}

impl Default for DatasetProvider {
    fn default() -> Self {
        Self::new("https://example.com")
    }
}

#[async_trait]
impl Provider for DatasetProvider {
    fn source(&self) -> Source {
        Source::Dataset
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Project>, ProviderError> {
        Ok(self.catalog(query, limit))
    }
}

/// Uppercase the first letter of every word, lowercase the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start_of_word = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    out
}
