use super::{bad_request, internal_error, not_found, AppState};
use crate::models::{CreateProfileRequest, UserProfile};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::post().to(upsert_profile))
        .route("/profile/{email}", web::get().to(get_profile));
}

/// Create or overwrite a profile
///
/// POST /api/profile
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "email": "string",
///   "branch": "string",
///   "year": "string",
///   "skills": ["string"],
///   "area_of_interest": ["string"]
/// }
/// ```
async fn upsert_profile(state: web::Data<AppState>, req: web::Json<CreateProfileRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for profile submission: {:?}", errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let req = req.into_inner();
    let profile = UserProfile {
        id: uuid::Uuid::new_v4(),
        name: req.name,
        email: req.email,
        branch: req.branch,
        year: req.year,
        skills: req.skills,
        area_of_interest: req.area_of_interest,
        created_at: chrono::Utc::now(),
    };

    match state.profiles.upsert(profile).await {
        Ok(stored) => {
            tracing::info!("Stored profile for {}", stored.email);
            HttpResponse::Ok().json(stored)
        }
        Err(e) => {
            tracing::error!("Failed to store profile: {}", e);
            internal_error("Failed to store profile", e.to_string())
        }
    }
}

/// GET /api/profile/{email}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let email = path.into_inner();

    match state.profiles.get(&email).await {
        Ok(Some(profile)) => HttpResponse::Ok().json(profile),
        Ok(None) => not_found(format!("Profile not found for {}", email)),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", email, e);
            internal_error("Failed to fetch profile", e.to_string())
        }
    }
}
