use super::{bad_request, internal_error, not_found, AppState};
use crate::core::{LevelFilter, RecommendError, SourceFilter};
use crate::models::{RecommendationRequest, SearchRequest};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects/search", web::get().to(search_projects))
        .route("/projects/recommendations", web::get().to(recommend_projects));
}

/// Search endpoint
///
/// GET /api/projects/search?query={query}&source={source}&level={level}
///
/// `source` is one of repository, paper, dataset, all; `level` is one of
/// easy, intermediate, advanced, all. Both are optional.
async fn search_projects(state: web::Data<AppState>, req: web::Query<SearchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let query = req.query.trim();
    if query.is_empty() {
        return bad_request("Validation failed", "query must not be blank");
    }

    let source = match SourceFilter::parse(req.source.as_deref()) {
        Ok(source) => source,
        Err(message) => return bad_request("Invalid source", message),
    };

    let level = match LevelFilter::parse(req.level.as_deref()) {
        Ok(level) => level,
        Err(message) => return bad_request("Invalid level", message),
    };

    tracing::info!("Searching projects: query='{}', source={:?}, level={:?}", query, source, level);

    let result = state.pipeline.search(query, source, level).await;

    tracing::info!(
        "Returning {} projects for '{}' (from {} candidates)",
        result.projects.len(),
        query,
        result.total_candidates
    );

    HttpResponse::Ok().json(result.projects)
}

/// Recommendation endpoint
///
/// GET /api/projects/recommendations?email={email}
async fn recommend_projects(
    state: web::Data<AppState>,
    req: web::Query<RecommendationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    match state.recommender.recommend(&req.email).await {
        Ok(projects) => {
            tracing::info!("Returning {} recommendations for {}", projects.len(), req.email);
            HttpResponse::Ok().json(projects)
        }
        Err(RecommendError::NotFound(email)) => not_found(format!("Profile not found for {}", email)),
        Err(e) => {
            tracing::error!("Failed to build recommendations for {}: {}", req.email, e);
            internal_error("Failed to build recommendations", e.to_string())
        }
    }
}
