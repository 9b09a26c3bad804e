//! Mentor directory, personalized once per handoff from the recommendation view.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api_client::CareerApi;
use crate::errors::AppError;
use crate::models::mentor::{Mentor, MentorHandoff, MentorListing};
use crate::models::survey::SurveyResult;
use crate::store::StateStore;

pub mod filter;
pub mod handlers;

use filter::{expertise_facets, filter_mentors, MentorQuery};

#[derive(Debug, Clone, Serialize)]
pub struct MentorsView {
    pub personalized_for: Option<String>,
    pub total: usize,
    pub count: usize,
    pub expertise: Vec<String>,
    pub mentors: Vec<Mentor>,
}

/// A handoff only applies to the survey it was written for.
fn handoff_is_current(handoff: &MentorHandoff, result: Option<&SurveyResult>) -> bool {
    result.is_some_and(|r| handoff.created_at >= r.completed_at)
}

/// The listing the directory filters over.
///
/// A pending handoff is consumed and replaces the listing: a current one
/// yields personalized matches, otherwise (or when matching fails or finds
/// nobody) the full directory is loaded. Without a handoff the stored
/// listing is reused unless `refresh` is set.
pub async fn load_mentors(
    api: &dyn CareerApi,
    store: &StateStore,
    refresh: bool,
) -> Result<MentorListing, AppError> {
    let listing = match store.take_mentor_handoff().await? {
        Some(handoff) => listing_for_handoff(api, store, handoff).await?,
        None => match store.mentor_listing().await? {
            Some(listing) if !refresh => {
                debug!("Reusing {} loaded mentors", listing.mentors.len());
                return Ok(listing);
            }
            _ => general_listing(api).await?,
        },
    };
    store.save_mentor_listing(&listing).await?;
    Ok(listing)
}

async fn listing_for_handoff(
    api: &dyn CareerApi,
    store: &StateStore,
    handoff: MentorHandoff,
) -> Result<MentorListing, AppError> {
    let result = store.survey_result().await?;
    if !handoff_is_current(&handoff, result.as_ref()) {
        debug!("Ignoring mentor handoff from an earlier survey");
        return general_listing(api).await;
    }

    let career = handoff.selected_career;
    match api.match_mentors(&career, &handoff.session_data).await {
        Ok(mentors) if !mentors.is_empty() => {
            info!("{} mentors matched for {}", mentors.len(), career.career_id);
            return Ok(MentorListing {
                mentors,
                personalized_for: Some(career),
            });
        }
        Ok(_) => info!("No personalized mentors for {}", career.career_id),
        Err(e) => warn!("Mentor matching failed, showing all mentors: {e}"),
    }
    general_listing(api).await
}

async fn general_listing(api: &dyn CareerApi) -> Result<MentorListing, AppError> {
    Ok(MentorListing {
        mentors: api.mentors().await?,
        personalized_for: None,
    })
}

pub fn mentors_view(listing: &MentorListing, query: &MentorQuery) -> MentorsView {
    let mentors = filter_mentors(&listing.mentors, query);
    MentorsView {
        personalized_for: listing.personalized_for.as_ref().map(|c| c.title.clone()),
        total: listing.mentors.len(),
        count: mentors.len(),
        expertise: expertise_facets(&listing.mentors),
        mentors,
    }
}
