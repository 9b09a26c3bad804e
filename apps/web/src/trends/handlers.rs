//! Axum route handlers for industry trends.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::trends::{resolve_field, resolve_period, trends_view, TrendsView};

#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub field: Option<String>,
    pub period: Option<String>,
}

/// GET /api/v1/trends?field=&period=
///
/// Without a field, reports on the top recommended career.
pub async fn handle_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<TrendsView>, AppError> {
    let period = resolve_period(query.period.as_deref())?;
    let field = resolve_field(&state.store, query.field.as_deref()).await?;

    let trends = state.api.industry_trends(&field, period).await?;
    Ok(Json(trends_view(&trends)))
}

/// GET /api/v1/trends/:field?period=
pub async fn handle_field_trends(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<TrendsView>, AppError> {
    let period = resolve_period(query.period.as_deref())?;
    if field.trim().is_empty() {
        return Err(AppError::Validation("field cannot be empty".to_string()));
    }

    let trends = state.api.trends_for_field(field.trim(), period).await?;
    Ok(Json(trends_view(&trends)))
}
