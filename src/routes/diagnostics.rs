use super::AppState;
use crate::models::{AccuracyResponse, HealthResponse};
use actix_web::{web, HttpResponse, Responder};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ml/accuracy", web::get().to(model_accuracy));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.profiles.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Recorded accuracy of the difficulty model
async fn model_accuracy(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(AccuracyResponse {
        accuracy: state.classifier.accuracy(),
        message: "Model accuracy".to_string(),
    })
}
