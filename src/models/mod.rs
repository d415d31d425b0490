// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{FeatureVector, Level, Project, ProviderLimits, Source, UserProfile, MAX_NOVELTY};
pub use requests::{CreateProfileRequest, RecommendationRequest, SearchRequest};
pub use responses::{AccuracyResponse, ErrorResponse, HealthResponse};
