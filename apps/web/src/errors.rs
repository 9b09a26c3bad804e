use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::api_client::ApiError;
use crate::survey::machine::SurveyError;

/// What the client should offer the user after an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// Retry the same view.
    Reload,
    /// Go back to the start of the survey.
    StartSurvey,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No completed survey found")]
    MissingSurvey,

    #[error(transparent)]
    Survey(#[from] SurveyError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn action(&self) -> RecoveryAction {
        match self {
            AppError::MissingSurvey
            | AppError::Survey(SurveyError::NotStarted)
            | AppError::Survey(SurveyError::AlreadyComplete) => RecoveryAction::StartSurvey,
            _ => RecoveryAction::Reload,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingSurvey => (
                StatusCode::CONFLICT,
                "SURVEY_REQUIRED",
                "Complete the career survey first".to_string(),
            ),
            AppError::Survey(e) => {
                let (status, code) = match e {
                    SurveyError::NotStarted => (StatusCode::CONFLICT, "SURVEY_NOT_STARTED"),
                    SurveyError::AlreadyComplete => (StatusCode::CONFLICT, "SURVEY_COMPLETE"),
                    SurveyError::IllegalTransition(_) => {
                        tracing::error!("{e}");
                        (StatusCode::CONFLICT, "ILLEGAL_TRANSITION")
                    }
                    SurveyError::UnknownQuestion(_)
                    | SurveyError::InvalidOption { .. }
                    | SurveyError::AnswerRequired(_)
                    | SurveyError::AtFirstQuestion => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "SURVEY_INPUT")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Api(e) => {
                tracing::warn!("Upstream error: {e}");
                match e {
                    ApiError::Status { status: 404, message } => {
                        (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
                    }
                    ApiError::Status { .. } => {
                        (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
                    }
                    ApiError::Transport(_) => (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_UNAVAILABLE",
                        "The career service could not be reached".to_string(),
                    ),
                    ApiError::Malformed(_) => (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_MALFORMED",
                        "The career service sent an unexpected response".to_string(),
                    ),
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "action": self.action(),
            }
        }));

        (status, body).into_response()
    }
}
