//! Axum route handlers for the roadmap view.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::recommendations::require_survey;
use crate::roadmap::cache::{load_or_generate, roadmap_for_career};
use crate::roadmap::{roadmaps_view, RoadmapView, RoadmapsView};
use crate::state::AppState;

/// GET /api/v1/roadmaps
///
/// Roadmaps for the top recommendations. Careers whose generation failed are
/// simply absent.
pub async fn handle_roadmaps(State(state): State<AppState>) -> Result<Json<RoadmapsView>, AppError> {
    let result = require_survey(&state.store).await?;
    let roadmaps = load_or_generate(state.api.as_ref(), &state.store, &result).await?;
    Ok(Json(roadmaps_view(&roadmaps)))
}

/// GET /api/v1/roadmaps/:career_id
pub async fn handle_roadmap(
    State(state): State<AppState>,
    Path(career_id): Path<String>,
) -> Result<Json<RoadmapView>, AppError> {
    let roadmap = roadmap_for_career(state.api.as_ref(), &state.store, &career_id).await?;
    Ok(Json(RoadmapView::from(&roadmap)))
}
