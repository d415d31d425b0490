//! Project Scout - discovery service for repositories, papers and datasets
//!
//! This library provides the aggregation and ranking pipeline behind the
//! service. A query fans out concurrently to every selected provider, the
//! normalized results are merged, filtered by difficulty, sorted by novelty
//! and truncated to a fixed cap.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Aggregator, Classifier, LevelFilter, Pipeline, Ranker, Recommender, SourceFilter};
pub use models::{Level, Project, Source, UserProfile};
