//! Roadmap generation with a freshness-checked cache.
//!
//! Roadmaps are generated for the top recommendations of the stored survey
//! and cached until that survey is replaced. A cache older than an hour
//! before the survey completed is regenerated.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::api_client::CareerApi;
use crate::errors::AppError;
use crate::models::roadmap::{LearningRoadmap, RoadmapCache};
use crate::models::survey::SurveyResult;
use crate::store::StateStore;

/// Roadmaps are generated for at most this many careers, in rank order.
pub const MAX_ROADMAPS: usize = 3;

const FRESHNESS_MINUTES: i64 = 60;

pub fn is_fresh(cache: &RoadmapCache, completed_at: DateTime<Utc>) -> bool {
    !cache.roadmaps.is_empty()
        && cache.generated_at > completed_at - Duration::minutes(FRESHNESS_MINUTES)
}

/// Requests a roadmap for each of the top careers concurrently and keeps
/// whichever succeed, in rank order.
pub async fn generate_roadmaps(api: &dyn CareerApi, result: &SurveyResult) -> Vec<LearningRoadmap> {
    let requests = result
        .recommendations
        .iter()
        .take(MAX_ROADMAPS)
        .map(|career| async move {
            match api.generate_roadmap(career, &result.merged_answers).await {
                Ok(mut roadmap) => {
                    roadmap.career_id = Some(career.career_id.clone());
                    if roadmap.career_title.is_empty() {
                        roadmap.career_title = career.title.clone();
                    }
                    Some(roadmap)
                }
                Err(e) => {
                    warn!("Roadmap generation for {} failed: {e}", career.career_id);
                    None
                }
            }
        });

    join_all(requests).await.into_iter().flatten().collect()
}

/// Cached roadmaps when fresh, otherwise newly generated ones. Nothing is
/// cached when every generation fails.
pub async fn load_or_generate(
    api: &dyn CareerApi,
    store: &StateStore,
    result: &SurveyResult,
) -> anyhow::Result<Vec<LearningRoadmap>> {
    if let Some(cache) = store.roadmap_cache().await? {
        if is_fresh(&cache, result.completed_at) {
            debug!("Serving {} cached roadmaps", cache.roadmaps.len());
            return Ok(cache.roadmaps);
        }
        debug!("Roadmap cache from {} is stale", cache.generated_at);
    }

    let roadmaps = generate_roadmaps(api, result).await;
    if roadmaps.is_empty() {
        warn!("No roadmaps could be generated");
        return Ok(roadmaps);
    }

    info!("Generated {} roadmaps", roadmaps.len());
    store
        .save_roadmap_cache(&RoadmapCache {
            roadmaps: roadmaps.clone(),
            generated_at: Utc::now(),
        })
        .await?;
    Ok(roadmaps)
}

/// A single career's roadmap: from the cache when it is fresh for the stored
/// survey, otherwise fetched from the service without caching it.
pub async fn roadmap_for_career(
    api: &dyn CareerApi,
    store: &StateStore,
    career_id: &str,
) -> Result<LearningRoadmap, AppError> {
    let cached = (store.roadmap_cache().await?, store.survey_result().await?);
    if let (Some(cache), Some(result)) = cached {
        if is_fresh(&cache, result.completed_at) {
            if let Some(roadmap) = cache.find(career_id) {
                return Ok(roadmap.clone());
            }
        } else {
            debug!("Roadmap cache from {} is stale", cache.generated_at);
        }
    }

    let mut roadmap = api.roadmap_for_career(career_id).await?;
    roadmap.career_id = Some(career_id.to_string());
    Ok(roadmap)
}
