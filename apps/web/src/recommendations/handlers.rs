//! Axum route handlers for the recommendation view.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::api_client::types::SkillGapReport;
use crate::errors::AppError;
use crate::models::career::CareerRecommendation;
use crate::models::mentor::MentorHandoff;
use crate::models::survey::SurveyResult;
use crate::recommendations::{load_recommendations, recommendations_view, require_survey, RecommendationsView};
use crate::state::AppState;

pub const MENTORS_PATH: &str = "/api/v1/mentors";

#[derive(Debug, Serialize)]
pub struct MentorHandoffResponse {
    pub career_id: String,
    pub redirect: &'static str,
}

fn find_career<'a>(
    result: &'a SurveyResult,
    career_id: &str,
) -> Result<&'a CareerRecommendation, AppError> {
    result
        .recommendation(career_id)
        .ok_or_else(|| AppError::NotFound(format!("Career '{career_id}' is not among your recommendations")))
}

/// GET /api/v1/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
) -> Result<Json<RecommendationsView>, AppError> {
    let result = load_recommendations(state.api.as_ref(), &state.store).await?;
    Ok(Json(recommendations_view(&result)))
}

/// POST /api/v1/recommendations/:career_id/mentors
///
/// Leaves a one-shot handoff for the mentor view so its next load is
/// personalized for this career.
pub async fn handle_find_mentors(
    State(state): State<AppState>,
    Path(career_id): Path<String>,
) -> Result<Json<MentorHandoffResponse>, AppError> {
    let result = require_survey(&state.store).await?;
    let career = find_career(&result, &career_id)?;

    state
        .store
        .set_mentor_handoff(&MentorHandoff {
            selected_career: career.clone(),
            session_data: result.merged_answers.clone(),
            created_at: Utc::now(),
        })
        .await?;
    info!("Mentor handoff written for {career_id}");

    Ok(Json(MentorHandoffResponse {
        career_id,
        redirect: MENTORS_PATH,
    }))
}

/// GET /api/v1/recommendations/:career_id/skill-gap
///
/// Compares the skills listed in the survey against the career's key skills.
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Path(career_id): Path<String>,
) -> Result<Json<SkillGapReport>, AppError> {
    let result = require_survey(&state.store).await?;
    let career = find_career(&result, &career_id)?;

    let report = state
        .api
        .skill_gap(&result.merged_answers.listed_skills(), &career.key_skills)
        .await?;
    Ok(Json(report))
}
