// Core pipeline exports
pub mod aggregator;
pub mod classifier;
pub mod filters;
pub mod pipeline;
pub mod ranker;
pub mod recommender;
pub mod scoring;

pub use aggregator::{Aggregation, Aggregator, ProviderFailure};
pub use classifier::{Classifier, ClassifierError, LogisticClassifier};
pub use filters::{LevelFilter, SourceFilter};
pub use pipeline::{Pipeline, PipelineLimits};
pub use ranker::{RankResult, Ranker, RECOMMENDATION_CAP, SEARCH_CAP};
pub use recommender::{profile_query, RecommendError, Recommender};
