//! Axum route handlers for the mentor directory.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::errors::AppError;
use crate::mentors::filter::MentorQuery;
use crate::mentors::{load_mentors, mentors_view, MentorsView};
use crate::state::AppState;

/// GET /api/v1/mentors?q=&expertise=&min_rating=&available_only=&refresh=
pub async fn handle_mentors(
    State(state): State<AppState>,
    Query(query): Query<MentorQuery>,
) -> Result<Json<MentorsView>, AppError> {
    if query.min_rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
        return Err(AppError::Validation(
            "min_rating must be between 0 and 5".to_string(),
        ));
    }
    let listing = load_mentors(state.api.as_ref(), &state.store, query.refresh).await?;
    Ok(Json(mentors_view(&listing, &query)))
}
