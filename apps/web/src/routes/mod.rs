pub mod catalog;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::mentors::handlers as mentors;
use crate::recommendations::handlers as recommendations;
use crate::roadmap::handlers as roadmap;
use crate::state::AppState;
use crate::survey::handlers as survey;
use crate::trends::handlers as trends;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Survey
        .route("/api/v1/survey", get(survey::handle_view))
        .route("/api/v1/survey/start", post(survey::handle_start))
        .route("/api/v1/survey/answer", post(survey::handle_answer))
        .route("/api/v1/survey/next", post(survey::handle_next))
        .route("/api/v1/survey/back", post(survey::handle_back))
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_recommendations),
        )
        .route(
            "/api/v1/recommendations/:career_id/mentors",
            post(recommendations::handle_find_mentors),
        )
        .route(
            "/api/v1/recommendations/:career_id/skill-gap",
            get(recommendations::handle_skill_gap),
        )
        // Roadmaps
        .route("/api/v1/roadmaps", get(roadmap::handle_roadmaps))
        .route("/api/v1/roadmaps/:career_id", get(roadmap::handle_roadmap))
        // Mentors
        .route("/api/v1/mentors", get(mentors::handle_mentors))
        // Trends
        .route("/api/v1/trends", get(trends::handle_trends))
        .route("/api/v1/trends/:field", get(trends::handle_field_trends))
        // Catalog
        .route("/api/v1/careers", get(catalog::handle_careers))
        .route("/api/v1/careers/:id", get(catalog::handle_career))
        .route("/api/v1/model-info", get(catalog::handle_model_info))
        .with_state(state)
}
