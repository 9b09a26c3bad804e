//! Read-only passthroughs for the upstream career catalog and model info.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::career::CareerRecommendation;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub count: usize,
    pub careers: Vec<CareerRecommendation>,
}

/// GET /api/v1/careers
pub async fn handle_careers(State(state): State<AppState>) -> Result<Json<CatalogResponse>, AppError> {
    let careers = state.api.careers().await?;
    Ok(Json(CatalogResponse {
        count: careers.len(),
        careers,
    }))
}

/// GET /api/v1/careers/:id
pub async fn handle_career(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CareerRecommendation>, AppError> {
    Ok(Json(state.api.career(&id).await?))
}

/// GET /api/v1/model-info
pub async fn handle_model_info(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(state.api.model_info().await?))
}
