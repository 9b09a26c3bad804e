//! Axum route handlers for the survey flow.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::survey::machine::SurveyView;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: String,
    #[serde(default)]
    pub value: String,
}

/// POST /api/v1/survey/start
///
/// Starts a fresh session. Any survey in progress is dropped.
pub async fn handle_start(State(state): State<AppState>) -> Result<Json<SurveyView>, AppError> {
    let view = state.survey.lock().await.start().await?;
    Ok(Json(view))
}

/// GET /api/v1/survey
pub async fn handle_view(State(state): State<AppState>) -> Result<Json<SurveyView>, AppError> {
    Ok(Json(state.survey.lock().await.view()?))
}

/// POST /api/v1/survey/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SurveyView>, AppError> {
    if request.question_id.trim().is_empty() {
        return Err(AppError::Validation("question_id cannot be empty".to_string()));
    }
    let view = state
        .survey
        .lock()
        .await
        .answer(&request.question_id, &request.value)?;
    Ok(Json(view))
}

/// POST /api/v1/survey/next
///
/// The lock is held until any submission finishes, so a repeated click waits
/// for the first one instead of sending the answers twice.
pub async fn handle_next(State(state): State<AppState>) -> Result<Json<SurveyView>, AppError> {
    let view = state.survey.lock().await.next().await?;
    Ok(Json(view))
}

/// POST /api/v1/survey/back
pub async fn handle_back(State(state): State<AppState>) -> Result<Json<SurveyView>, AppError> {
    Ok(Json(state.survey.lock().await.back()?))
}
